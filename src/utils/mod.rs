pub mod image;
pub mod qrcode;

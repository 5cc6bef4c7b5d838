pub mod bom;
pub mod car_header;
pub mod info;
pub mod rendition;

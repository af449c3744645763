pub mod economy;
pub mod image;

mod error;
mod image;
mod template;

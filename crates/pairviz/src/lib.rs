#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use pairviz_3d as k3d;

#[doc(inline)]
pub use pairviz_image as image;

#[doc(inline)]
pub use pairviz_io as io;

#[doc(inline)]
pub use pairviz_render as render;

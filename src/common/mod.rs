//! Level metering utilities.

mod f32_array_ext;

pub use f32_array_ext::F32ArrayExt;

//! Render adapter seam and frame loop

pub mod instance;
pub mod adapter;
pub mod headless;
pub mod driver;

pub use instance::InstanceData;
pub use adapter::RenderAdapter;
pub use headless::HeadlessAdapter;
pub use driver::FrameDriver;

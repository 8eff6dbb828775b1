pub mod desktop;
pub mod frame;
pub mod gesture;
pub mod gui;
pub mod input_bridge;
pub mod instance;
pub mod logging;
pub mod manager;
pub mod overlay;
pub mod projection;
pub mod reconcile;
pub mod selection;
pub mod settings;
pub mod source;
pub mod swapchain;

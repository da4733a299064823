mod event;
mod event_vendor;

pub use event::Event;
pub use event_vendor::EventVendor;

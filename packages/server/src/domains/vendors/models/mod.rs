mod vendor;

pub use vendor::Vendor;

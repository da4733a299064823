mod venue;

pub use venue::Venue;

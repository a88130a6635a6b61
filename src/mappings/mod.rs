mod key_names;

pub use key_names::KeyNames;

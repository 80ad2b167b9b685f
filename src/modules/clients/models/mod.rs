mod client_profile;

pub use client_profile::ClientProfile;

mod client_controller;

pub use client_controller::ClientController;

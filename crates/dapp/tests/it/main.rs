mod events;
mod mint;
mod network;
mod session;

fn main() {}

mod common;
mod features;
mod quality;

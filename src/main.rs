mod cli;
mod config;
mod error;
mod jobs;
mod library;
mod review;
mod runtime;
mod tags;
mod text;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}

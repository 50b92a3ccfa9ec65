use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "vidmux")]
#[command(about = "Merge the best video and audio streams of two files into one container")]
pub struct Args {
    /// File providing the video stream
    pub video: PathBuf,

    /// File providing the audio stream
    pub audio: PathBuf,

    /// Output file; the container format follows its extension
    pub output: PathBuf,
}

impl Args {
    pub fn run(self) -> Result<()> {
        crate::pipeline::run(&self.video, &self.audio, &self.output)
    }
}

pub mod analysis;
pub mod bands;
pub mod cepstrum;
pub mod decode;
pub mod dynamics;
pub mod features;
pub mod frames;
pub mod loudness;
pub mod spectrum;
pub mod stats;
pub mod stereo;

pub mod downsampler;
pub mod level_meter;
pub mod meter_window;
pub mod pcm_buffer;
pub mod wav_codec;

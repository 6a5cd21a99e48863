mod flac;
mod mpeg;
mod probe;
mod util;

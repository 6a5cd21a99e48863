/// Errors that could occur while reading metadata
#[derive(thiserror::Error, Debug)]
pub enum MetaError {
	// Format detection
	/// Unable to guess the format
	#[error("No format could be determined from the provided stream")]
	UnknownFormat,

	// Structural errors
	/// The container violates its binary layout (bad magic, truncated block, ...)
	#[error("Malformed container: {0}")]
	MalformedContainer(&'static str),
	/// The data is well formed, but uses a construct that isn't handled
	#[error("Unsupported: {0}")]
	Unsupported(&'static str),
	/// MPEG synchronization gave up before finding 4 consecutive matching frames
	#[error("Searched too many bytes without finding a valid MPEG frame")]
	SearchExhausted,

	// Reader errors
	/// The byte source ended before the requested bytes were available
	#[error("Unexpected end of input")]
	EndOfInput,
	/// A cursor read went past the end of its buffer
	#[error("Attempted to read {requested} bytes with only {remaining} remaining")]
	OutOfBounds {
		/// Number of bytes the read needed
		requested: usize,
		/// Number of bytes left in the buffer
		remaining: usize,
	},

	/// Errors while loading [`ParseOptions`](crate::ParseOptions)
	#[error(transparent)]
	Config(#[from] Box<figment::Error>),
	/// Represents all cases of `std::io::Error`.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl MetaError {
	/// Whether this error only signals that the input ran out
	pub fn is_end_of_input(&self) -> bool {
		match self {
			Self::EndOfInput => true,
			Self::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
			_ => false,
		}
	}
}

impl From<figment::Error> for MetaError {
	fn from(err: figment::Error) -> Self {
		Self::Config(Box::new(err))
	}
}

/// Result of metadata operations.
pub type Result<T> = std::result::Result<T, MetaError>;

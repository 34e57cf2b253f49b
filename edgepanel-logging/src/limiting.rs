use std::fmt::{self, Debug, Display};

/// Truncates the formatted value to at most `limit` bytes when logged
pub struct MaxLogLength<'a, T: ?Sized> {
    limit: Option<usize>,
    val: &'a T,
}

impl<'a, T: ?Sized> MaxLogLength<'a, T> {
    pub fn new(limit: Option<usize>, val: &'a T) -> Self {
        Self { limit, val }
    }

    fn write_limited(&self, f: &mut fmt::Formatter<'_>, fmt: String) -> fmt::Result {
        match self.limit {
            Some(limit) if fmt.len() > limit => {
                let mut end = limit;
                while !fmt.is_char_boundary(end) {
                    end -= 1;
                }
                write!(f, "{}...", &fmt[..end])
            }
            _ => write!(f, "{}", fmt),
        }
    }
}

impl<'a, T: Debug + ?Sized> Debug for MaxLogLength<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_limited(f, format!("{:?}", self.val))
    }
}

impl<'a, T: Display + ?Sized> Display for MaxLogLength<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_limited(f, self.val.to_string())
    }
}

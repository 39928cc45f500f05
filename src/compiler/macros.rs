// Writes a comment to the instruction stream in debug builds or with the comments feature.
macro_rules! comment {
    ($self:ident, $format:literal $(, $value:expr)*) => {
        #[cfg(any(debug_assertions, feature="comments"))]
        $self.backend.comment(&format!($format $(, $value)*));
    }
}

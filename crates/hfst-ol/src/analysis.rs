use std::fmt;

/// One lookup result.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Concatenated display strings of the path's output symbols.
    pub output: String,
    /// Path weight plus final weight. Always `Some` for weighted
    /// transducers and `None` for unweighted ones.
    pub weight: Option<f32>,
}

impl Analysis {
    pub fn new(output: String, weight: Option<f32>) -> Self {
        Self { output, weight }
    }
}

/// Renders `output`, or `output<TAB>weight` when weighted.
impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(weight) => write!(f, "{}\t{}", self.output, weight),
            None => f.write_str(&self.output),
        }
    }
}

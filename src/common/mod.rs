//! Common utilities and types for sensor smoothing

/// Common types used across the codebase
pub mod types {
    /// A single scalar sensor reading
    pub type Sample = f64;

    /// One reading or a batch of readings to append to a filter buffer.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Samples {
        Scalar(Sample),
        Sequence(Vec<Sample>),
    }

    impl Samples {
        /// Number of readings carried
        pub fn len(&self) -> usize {
            match self {
                Samples::Scalar(_) => 1,
                Samples::Sequence(values) => values.len(),
            }
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Readings in arrival order
        pub fn into_vec(self) -> Vec<Sample> {
            match self {
                Samples::Scalar(x) => vec![x],
                Samples::Sequence(values) => values,
            }
        }
    }

    impl From<f64> for Samples {
        fn from(x: f64) -> Self {
            Samples::Scalar(x)
        }
    }

    impl From<i32> for Samples {
        fn from(x: i32) -> Self {
            Samples::Scalar(x as f64)
        }
    }

    impl From<Vec<f64>> for Samples {
        fn from(values: Vec<f64>) -> Self {
            Samples::Sequence(values)
        }
    }

    impl From<&[f64]> for Samples {
        fn from(values: &[f64]) -> Self {
            Samples::Sequence(values.to_vec())
        }
    }

    impl<const N: usize> From<[f64; N]> for Samples {
        fn from(values: [f64; N]) -> Self {
            Samples::Sequence(values.to_vec())
        }
    }

}

use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::Index;

/// Fixed-length numeric vector used to pass values into and read values
/// out of a layer. The length is immutable after construction: the data
/// is private and no growth API is exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IOVector {
    data: Vec<f64>,
}

impl IOVector {
    pub fn new(data: Vec<f64>) -> IOVector {
        IOVector { data }
    }

    pub fn zeros(len: usize) -> IOVector {
        IOVector { data: vec![0.0; len] }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

impl From<Vec<f64>> for IOVector {
    fn from(data: Vec<f64>) -> IOVector {
        IOVector { data }
    }
}

impl Index<usize> for IOVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

/// Renders the values comma-and-space separated, no brackets, no
/// trailing separator: `1.5, -2.25, 3`.
impl fmt::Display for IOVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_comma_space_separated_without_brackets() {
        let v = IOVector::new(vec![1.5, -2.25, 3.0]);
        assert_eq!(v.to_string(), "1.5, -2.25, 3");
    }

    #[test]
    fn display_of_single_element_has_no_separator() {
        let v = IOVector::new(vec![0.5]);
        assert_eq!(v.to_string(), "0.5");
    }

    #[test]
    fn display_of_empty_vector_is_empty() {
        let v = IOVector::new(vec![]);
        assert_eq!(v.to_string(), "");
    }

    #[test]
    fn get_and_index_agree() {
        let v = IOVector::new(vec![4.0, 5.0]);
        assert_eq!(v.get(1), Some(5.0));
        assert_eq!(v[1], 5.0);
        assert_eq!(v.get(2), None);
    }

    #[test]
    fn zeros_has_requested_length() {
        let v = IOVector::zeros(4);
        assert_eq!(v.len(), 4);
        assert!(v.as_slice().iter().all(|&x| x == 0.0));
    }
}

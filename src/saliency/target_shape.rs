use crate::error::ShapeError;

/// Output resolution of a resized saliency map, `(height, width)`, both positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetShape {
    height: usize,
    width: usize,
}

impl TargetShape {
    pub fn new(height: usize, width: usize) -> Result<Self, ShapeError> {
        if height == 0 || width == 0 || height.checked_mul(width).is_none() {
            return Err(ShapeError::TargetShape {
                found: vec![height, width],
            });
        }
        Ok(Self { height, width })
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn pixels(&self) -> usize {
        self.height * self.width
    }
}

impl TryFrom<(usize, usize)> for TargetShape {
    type Error = ShapeError;

    fn try_from((height, width): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(height, width)
    }
}

impl TryFrom<&[usize]> for TargetShape {
    type Error = ShapeError;

    fn try_from(dims: &[usize]) -> Result<Self, Self::Error> {
        match *dims {
            [height, width] => Self::new(height, width),
            _ => Err(ShapeError::TargetShape {
                found: dims.to_vec(),
            }),
        }
    }
}

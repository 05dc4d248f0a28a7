/// Packing and masking metadata attached to a variable.
///
/// TEMPO products store values three ways: packed fixed-point integers with
/// `scale_factor`/`add_offset` attributes, arrays with `_FillValue` or
/// `missing_value` sentinels, and plain floating scalars. Every reader
/// variant funnels through [`normalized_mean`] so all three reduce to the
/// same plain `f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValueCoding {
    pub scale: Option<f64>,
    pub offset: Option<f64>,
    pub fill: Option<f64>,
}

impl ValueCoding {
    /// Decode one raw cell, or None if the cell is masked.
    fn decode(&self, raw: f64) -> Option<f64> {
        if raw.is_nan() {
            return None;
        }
        if let Some(fill) = self.fill {
            if raw == fill {
                return None;
            }
        }
        Some(raw * self.scale.unwrap_or(1.0) + self.offset.unwrap_or(0.0))
    }
}

/// Mean over the valid cells of a variable.
///
/// `keep` is the quality mask, parallel to `raw`; cells with `keep[i] ==
/// false` are excluded. A mask whose length does not match the data is
/// ignored rather than misapplied. Returns None when no valid cell remains.
pub fn normalized_mean(raw: &[f64], coding: &ValueCoding, keep: Option<&[bool]>) -> Option<f64> {
    let mask = keep.filter(|m| m.len() == raw.len());

    let mut sum = 0.0;
    let mut count = 0usize;
    for (index, &cell) in raw.iter().enumerate() {
        if let Some(mask) = mask {
            if !mask[index] {
                continue;
            }
        }
        if let Some(value) = coding.decode(cell) {
            sum += value;
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

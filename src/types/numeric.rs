use std::time::Duration;

use graphbinary_error::{GraphBinaryError, GraphBinaryResult};
use rust_decimal::Decimal;

/// Arbitrary precision integer, stored as minimal big-endian two's
/// complement bytes (zero is a single `0x00`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInteger(Vec<u8>);

impl BigInteger {
    /// Builds from two's complement bytes, dropping redundant sign bytes.
    pub fn from_be_bytes(bytes: &[u8]) -> GraphBinaryResult<Self> {
        if bytes.is_empty() {
            return Err(GraphBinaryError::malformed(
                "BigInteger",
                "magnitude has zero length",
            ));
        }
        Ok(Self(minimize(bytes)))
    }

    pub fn as_be_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0[0] & 0x80 != 0
    }

    /// Value as `i128`, `None` when it does not fit.
    pub fn to_i128(&self) -> Option<i128> {
        if self.0.len() > 16 {
            return None;
        }
        let fill = if self.is_negative() { 0xFF } else { 0x00 };
        let mut buf = [fill; 16];
        buf[16 - self.0.len()..].copy_from_slice(&self.0);
        Some(i128::from_be_bytes(buf))
    }
}

fn minimize(bytes: &[u8]) -> Vec<u8> {
    let mut start = 0;
    while start + 1 < bytes.len() {
        let (b, next) = (bytes[start], bytes[start + 1]);
        let redundant = (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

impl From<i128> for BigInteger {
    fn from(v: i128) -> Self {
        Self(minimize(&v.to_be_bytes()))
    }
}

impl From<i64> for BigInteger {
    fn from(v: i64) -> Self {
        Self::from(v as i128)
    }
}

/// Arbitrary precision decimal: `unscaled * 10^-scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal {
    pub scale: i32,
    pub unscaled: BigInteger,
}

impl BigDecimal {
    pub fn new(
        unscaled: impl Into<BigInteger>,
        scale: i32,
    ) -> Self {
        Self {
            scale,
            unscaled: unscaled.into(),
        }
    }
}

impl From<Decimal> for BigDecimal {
    fn from(d: Decimal) -> Self {
        Self {
            scale: d.scale() as i32,
            unscaled: BigInteger::from(d.mantissa()),
        }
    }
}

impl TryFrom<&BigDecimal> for Decimal {
    type Error = GraphBinaryError;

    fn try_from(v: &BigDecimal) -> Result<Self, Self::Error> {
        let mantissa = v
            .unscaled
            .to_i128()
            .ok_or_else(|| GraphBinaryError::malformed("BigDecimal", "exceeds 128 bits"))?;
        let scale = u32::try_from(v.scale).map_err(|_| {
            GraphBinaryError::malformed("BigDecimal", format!("negative scale {}", v.scale))
        })?;
        Decimal::try_from_i128_with_scale(mantissa, scale)
            .map_err(|e| GraphBinaryError::malformed("BigDecimal", e.to_string()))
    }
}

/// Signed duration with nanosecond precision; `nanos` is within
/// `0..1_000_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GDuration {
    pub seconds: i64,
    pub nanos: i32,
}

impl GDuration {
    pub const NANOS_PER_SECOND: i32 = 1_000_000_000;

    pub fn new(
        seconds: i64,
        nanos: i32,
    ) -> GraphBinaryResult<Self> {
        if !(0..Self::NANOS_PER_SECOND).contains(&nanos) {
            return Err(GraphBinaryError::malformed(
                "Duration",
                format!("nanosecond adjustment {nanos} out of range"),
            ));
        }
        Ok(Self { seconds, nanos })
    }
}

impl TryFrom<Duration> for GDuration {
    type Error = GraphBinaryError;

    fn try_from(d: Duration) -> Result<Self, Self::Error> {
        let seconds = i64::try_from(d.as_secs())
            .map_err(|_| GraphBinaryError::malformed("Duration", "seconds exceed i64"))?;
        Ok(Self {
            seconds,
            nanos: d.subsec_nanos() as i32,
        })
    }
}

impl TryFrom<GDuration> for Duration {
    type Error = GraphBinaryError;

    fn try_from(d: GDuration) -> Result<Self, Self::Error> {
        let secs = u64::try_from(d.seconds)
            .map_err(|_| GraphBinaryError::malformed("Duration", "negative duration"))?;
        Ok(Duration::new(secs, d.nanos as u32))
    }
}

/*
 * Responsibility
 * - 公開 ID ↔ 内部 ID の変換 (encode/decode)
 * - URL に出る resource id はすべてここを通す (内部の連番を外に出さない)
 */
use sqids::Sqids;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdCodecError>;

#[derive(Debug, Error)]
pub enum IdCodecError {
    #[error("SQIDS_MIN_LENGTH must be between 0 and 255, got {value}")]
    InvalidMinLength { value: usize },
    #[error("sqids error: {0}")]
    Sqids(#[from] sqids::Error),
    #[error("id must be non-negative, got {value}")]
    NegativeId { value: i64 },
    #[error("invalid public id format")]
    DecodeInvalidFormat,
    #[error("decoded id is out of range")]
    DecodeOutOfRange,
}

#[derive(Clone, Debug)]
pub struct IdCodec {
    sqids: Sqids,
}

impl IdCodec {
    pub fn new(min_length: usize, alphabet: &str) -> Result<Self> {
        let min_length: u8 = min_length
            .try_into()
            .map_err(|_| IdCodecError::InvalidMinLength { value: min_length })?;

        let sqids = Sqids::builder()
            .min_length(min_length)
            .alphabet(alphabet.chars().collect())
            .build()?;

        Ok(Self { sqids })
    }

    pub fn encode(&self, id: i64) -> Result<String> {
        if id < 0 {
            return Err(IdCodecError::NegativeId { value: id });
        }
        Ok(self.sqids.encode(&[id as u64])?)
    }

    pub fn decode(&self, public_id: &str) -> Result<i64> {
        let nums = self.sqids.decode(public_id);
        if nums.len() != 1 {
            return Err(IdCodecError::DecodeInvalidFormat);
        }
        // Reject non-canonical spellings that happen to decode to the same number.
        if self.sqids.encode(&nums)? != public_id {
            return Err(IdCodecError::DecodeInvalidFormat);
        }
        i64::try_from(nums[0]).map_err(|_| IdCodecError::DecodeOutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    #[test]
    fn public_ids_hide_the_sequence_and_decode_back() {
        let codec = IdCodec::new(10, ALPHABET).unwrap();
        let public = codec.encode(42).unwrap();

        assert!(public.len() >= 10);
        assert_ne!(public, "42");
        assert_eq!(codec.decode(&public).unwrap(), 42);
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = IdCodec::new(10, ALPHABET).unwrap();
        assert!(codec.decode("").is_err());
        assert!(codec.decode("!!!").is_err());
        assert!(matches!(
            codec.encode(-1),
            Err(IdCodecError::NegativeId { value: -1 })
        ));
    }

    #[test]
    fn min_length_is_bounded() {
        assert!(matches!(
            IdCodec::new(300, ALPHABET),
            Err(IdCodecError::InvalidMinLength { value: 300 })
        ));
    }
}

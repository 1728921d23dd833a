use std::ops::Deref;

use serde::Deserialize;

/// A duration written as whitespace separated `<number><unit>` parts, e.g.
/// `"1d 2h 3m 4s"`. Supported units are `s`, `m`, `h` and `d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::str::FromStr for Duration {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .try_fold(0u64, |total, part| {
                let (value, unit) = part.split_at(
                    part.find(|c: char| !c.is_ascii_digit())
                        .ok_or("Missing unit in duration")?,
                );
                let value = value.parse::<u64>().map_err(|_| "Invalid number in duration")?;
                let factor = match unit {
                    "s" => 1,
                    "m" => 60,
                    "h" => 60 * 60,
                    "d" => 24 * 60 * 60,
                    _ => return Err("Invalid unit in duration"),
                };
                value
                    .checked_mul(factor)
                    .and_then(|x| x.checked_add(total))
                    .ok_or("Duration is too long")
            })
            .map(|seconds| Self(std::time::Duration::from_secs(seconds)))
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_duration() {
        for (input, expected) in [
            ("30s", Some(30)),
            ("10m", Some(10 * 60)),
            ("2h", Some(2 * 60 * 60)),
            ("7d", Some(7 * 24 * 60 * 60)),
            ("", Some(0)),
            ("  1d 2h\t3m 4s ", Some(((24 + 2) * 60 + 3) * 60 + 4)),
            ("5m 5m", Some(10 * 60)),
            ("10", None),
            ("m", None),
            ("10x", None),
            ("10mm", None),
            ("-5s", None),
            ("99999999999999999999d", None),
        ] {
            let output = serde_json::from_value::<Duration>(input.into())
                .ok()
                .map(|x| x.as_secs());
            assert_eq!(output, expected, "{input:?}");
        }
    }

    #[test]
    fn non_string_is_rejected() {
        assert!(serde_json::from_value::<Duration>(42.into()).is_err());
    }
}

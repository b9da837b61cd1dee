//! ParameterModel: the editable prompt and sampling knobs
//!
//! Numeric setters clamp out-of-range values to the nearest bound and
//! accept them; a value outside its range can never be stored. Non-finite
//! floats are ignored and leave the previous value in place.

use log::{debug, warn};

/// Bounds, slider step and default of one numeric knob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange<T>
{   pub min: T
  , pub max: T
  , pub step: T
  , pub default: T
}

impl<T: PartialOrd + Copy> ParamRange<T>
{   /// Nearest value inside `[min, max]`
    pub fn clamp(&self, value: T) -> T
    {   if value < self.min
        {   self.min
        } else if value > self.max
        {   self.max
        } else
        {   value
        }
    }

    pub fn contains(&self, value: T) -> bool
    {   value >= self.min && value <= self.max
    }
}

pub const TEMPERATURE: ParamRange<f64> = ParamRange
{   min: 0.1
  , max: 1.5
  , step: 0.1
  , default: 0.8
};

pub const TOP_K: ParamRange<u32> = ParamRange
{   min: 1
  , max: 100
  , step: 1
  , default: 50
};

pub const TOP_P: ParamRange<f64> = ParamRange
{   min: 0.1
  , max: 1.0
  , step: 0.05
  , default: 0.95
};

/// Current prompt, content type and sampling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterModel
{   prompt: String
  , content_type: crate::ContentType
  , temperature: f64
  , top_k: u32
  , top_p: f64
}

impl Default for ParameterModel
{   fn default() -> Self
    {   ParameterModel
        {   prompt: String::new()
          , content_type: crate::ContentType::default()
          , temperature: TEMPERATURE.default
          , top_k: TOP_K.default
          , top_p: TOP_P.default
        }
    }
}

impl ParameterModel
{   pub fn new() -> Self
    {   Self::default()
    }

    pub fn prompt(&self) -> &str
    {   &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>)
    {   self.prompt = prompt.into();
    }

    pub fn content_type(&self) -> crate::ContentType
    {   self.content_type
    }

    pub fn set_content_type(&mut self, content_type: crate::ContentType)
    {   self.content_type = content_type;
    }

    pub fn temperature(&self) -> f64
    {   self.temperature
    }

    /// Store `value` clamped to [0.1, 1.5]; returns the stored value
    pub fn set_temperature(&mut self, value: f64) -> f64
    {   if let Some(v) = clamp_float("temperature", &TEMPERATURE, value)
        {   self.temperature = v;
        }
        self.temperature
    }

    pub fn top_k(&self) -> u32
    {   self.top_k
    }

    /// Store `value` clamped to [1, 100]; returns the stored value
    pub fn set_top_k(&mut self, value: u32) -> u32
    {   let clamped = TOP_K.clamp(value);
        if clamped != value
        {   debug!("top_k {} clamped to {}", value, clamped);
        }
        self.top_k = clamped;
        self.top_k
    }

    pub fn top_p(&self) -> f64
    {   self.top_p
    }

    /// Store `value` clamped to [0.1, 1.0]; returns the stored value
    pub fn set_top_p(&mut self, value: f64) -> f64
    {   if let Some(v) = clamp_float("top_p", &TOP_P, value)
        {   self.top_p = v;
        }
        self.top_p
    }

    /// True iff the trimmed prompt is non-empty
    pub fn is_submittable(&self) -> bool
    {   !self.prompt.trim().is_empty()
    }

    /// Owned copy of the current values plus the fixed token budget
    pub fn snapshot(&self) -> crate::request::GenerationRequest
    {   crate::request::GenerationRequest
        {   prompt: self.prompt.clone()
          , content_type: self.content_type
          , temperature: self.temperature
          , top_k: self.top_k
          , top_p: self.top_p
          , max_new_tokens: crate::MAX_NEW_TOKENS
        }
    }
}

fn clamp_float(
  name: &str
, range: &ParamRange<f64>
, value: f64
) -> Option<f64>
{   if !value.is_finite()
    {   warn!("ignoring non-finite {}: {}", name, value);
        return None;
    }
    let clamped = range.clamp(value);
    if clamped != value
    {   debug!("{} {} clamped to {}", name, value, clamped);
    }
    Some(clamped)
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn defaults_match_ranges()
    {   let params = ParameterModel::new();
        assert_eq!(params.prompt(), "");
        assert_eq!(params.content_type(), crate::ContentType::Story);
        assert_eq!(params.temperature(), 0.8);
        assert_eq!(params.top_k(), 50);
        assert_eq!(params.top_p(), 0.95);
    }

    #[test]
    fn whitespace_prompts_are_not_submittable()
    {   let mut params = ParameterModel::new();
        for prompt in ["", " ", "\t\n", "  \r\n  "]
        {   params.set_prompt(prompt);
            assert!(!params.is_submittable(), "{:?}", prompt);
        }
        params.set_prompt("  a cat  ");
        assert!(params.is_submittable());
    }

    #[test]
    fn out_of_range_values_are_clamped()
    {   let mut params = ParameterModel::new();
        assert_eq!(params.set_temperature(3.0), 1.5);
        assert_eq!(params.set_temperature(0.0), 0.1);
        assert_eq!(params.set_top_k(0), 1);
        assert_eq!(params.set_top_k(500), 100);
        assert_eq!(params.set_top_p(-1.0), 0.1);
        assert_eq!(params.set_top_p(1.2), 1.0);
    }

    #[test]
    fn non_finite_values_are_ignored()
    {   let mut params = ParameterModel::new();
        params.set_temperature(1.1);
        assert_eq!(params.set_temperature(f64::NAN), 1.1);
        assert_eq!(params.set_top_p(f64::INFINITY), 0.95);
        assert!(TEMPERATURE.contains(params.temperature()));
    }

    #[test]
    fn in_range_values_round_trip_through_snapshot()
    {   let mut params = ParameterModel::new();
        params.set_prompt("Autumn leaves");
        params.set_content_type(crate::ContentType::Poem);
        for (t, k, p) in [(0.1, 1, 0.1), (0.85, 37, 0.55), (1.5, 100, 1.0)]
        {   params.set_temperature(t);
            params.set_top_k(k);
            params.set_top_p(p);
            let request = params.snapshot();
            assert_eq!(request.temperature, t);
            assert_eq!(request.top_k, k);
            assert_eq!(request.top_p, p);
            assert_eq!(request.content_type, crate::ContentType::Poem);
            assert_eq!(request.max_new_tokens, crate::MAX_NEW_TOKENS);
        }
    }

    #[test]
    fn snapshot_is_detached_from_later_edits()
    {   let mut params = ParameterModel::new();
        params.set_prompt("first");
        let request = params.snapshot();
        params.set_prompt("second");
        params.set_top_k(3);
        assert_eq!(request.prompt, "first");
        assert_eq!(request.top_k, 50);
    }
}

//! Resting metabolic rate via the Harris-Benedict equation.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

/// Demographic inputs for the BMR computation. Single-operator deployment:
/// one set of values for the whole process, supplied through configuration
/// rather than per request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Demographics {
    pub age: u32,
    pub height_cm: f64,
    pub sex: Sex,
}

impl Default for Demographics {
    fn default() -> Self {
        Self {
            age: 30,
            height_cm: 170.0,
            sex: Sex::Male,
        }
    }
}

impl Demographics {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads `WELLNESS_AGE`, `WELLNESS_HEIGHT_CM` and `WELLNESS_SEX`;
    /// missing or unparsable values keep their defaults.
    pub fn from_env_with<F>(mut get: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let age = get("WELLNESS_AGE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.age);
        let height_cm = get("WELLNESS_HEIGHT_CM")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.height_cm);
        let sex = match get("WELLNESS_SEX").as_deref() {
            Some(s) if s.eq_ignore_ascii_case("female") => Sex::Female,
            Some(s) if s.eq_ignore_ascii_case("male") => Sex::Male,
            _ => defaults.sex,
        };
        Self {
            age,
            height_cm,
            sex,
        }
    }
}

/// Harris-Benedict estimate, rounded to the nearest kcal/day.
pub fn resting_metabolic_rate(weight_kg: f64, demo: &Demographics) -> i64 {
    let h = demo.height_cm;
    let a = f64::from(demo.age);
    let bmr = match demo.sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * h - 5.677 * a,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * h - 4.330 * a,
    };
    bmr.round() as i64
}

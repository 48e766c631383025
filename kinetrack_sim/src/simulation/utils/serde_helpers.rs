// kinetrack_sim/src/simulation/utils/serde_helpers.rs

pub mod state_vector_from_array {
    use kinetrack_core::types::StateVector;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(vec: &StateVector, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(vec.iter())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<StateVector, D::Error>
    where
        D: Deserializer<'de>,
    {
        let arr: [f64; 4] = Deserialize::deserialize(deserializer)?;
        Ok(StateVector::from_row_slice(&arr))
    }
}

pub mod option_state_vector_from_array {
    use kinetrack_core::types::StateVector;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(vec: &Option<StateVector>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match vec {
            Some(v) => serializer.collect_seq(v.iter()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<StateVector>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let arr: Option<[f64; 4]> = Deserialize::deserialize(deserializer)?;
        Ok(arr.map(|a| StateVector::from_row_slice(&a)))
    }
}

/// A 4×4 matrix written as four rows, e.g. `[[1, 0, 0, 0], ...]`.
pub mod state_covariance_from_rows {
    use kinetrack_core::types::StateCovariance;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(mat: &StateCovariance, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rows: Vec<[f64; 4]> = mat
            .row_iter()
            .map(|r| [r[0], r[1], r[2], r[3]])
            .collect();
        serializer.collect_seq(rows.iter())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<StateCovariance, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: [[f64; 4]; 4] = Deserialize::deserialize(deserializer)?;
        Ok(StateCovariance::from_fn(|i, j| rows[i][j]))
    }
}

#[cfg(test)]
mod tests {
    use figment::{
        providers::{Format, Toml},
        Figment,
    };
    use kinetrack_core::types::{StateCovariance, StateVector};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(with = "super::state_vector_from_array")]
        x: StateVector,
        #[serde(with = "super::state_covariance_from_rows")]
        p: StateCovariance,
    }

    #[test]
    fn arrays_map_onto_state_layout() {
        let fields: Fields = Figment::new()
            .merge(Toml::string(
                r#"
                x = [1.0, 2.0, 3.0, 4.0]
                p = [[1.0, 2.0, 0.0, 0.0],
                     [2.0, 5.0, 0.0, 0.0],
                     [0.0, 0.0, 1.0, 0.0],
                     [0.0, 0.0, 0.0, 7.0]]
                "#,
            ))
            .extract()
            .unwrap();
        assert_eq!(fields.x, StateVector::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(fields.p[(0, 1)], 2.0);
        assert_eq!(fields.p[(1, 1)], 5.0);
        assert_eq!(fields.p[(3, 3)], 7.0);
    }
}

//! Fixed feature layout shared by the training corpus and live requests.

use crate::backend::{Backend, Tensor2D};
use crate::fare::{BagSize, FareError, Season, Station, TripRecord};
use crate::preprocessing::{
    ColumnSpec, ColumnTransformer, HandleUnknown, OneHotEncoder, PreprocessingError, Remainder,
};

/// Column order of a raw trip row. Categorical levels are stored as their
/// canonical index.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureSchema;

impl FeatureSchema {
    pub const COLUMNS: [&'static str; 7] = [
        "station",
        "train_arrival_density",
        "season",
        "num_bags",
        "total_weight_kg",
        "avg_bag_size",
        "platform_distance_m",
    ];

    pub const STATION: usize = 0;
    pub const SEASON: usize = 2;
    pub const BAG_SIZE: usize = 5;
    pub const CATEGORICAL: [usize; 3] = [Self::STATION, Self::SEASON, Self::BAG_SIZE];

    pub fn n_features(&self) -> usize {
        Self::COLUMNS.len()
    }

    /// Raw feature row for one trip.
    pub fn row(&self, trip: &TripRecord) -> Vec<f32> {
        vec![
            trip.station().index() as f32,
            trip.train_arrival_density() as f32,
            trip.season().index() as f32,
            trip.num_bags() as f32,
            trip.total_weight_kg() as f32,
            trip.avg_bag_size().index() as f32,
            trip.platform_distance_m() as f32,
        ]
    }

    pub fn matrix<B: Backend>(&self, trips: &[TripRecord]) -> Tensor2D<B> {
        let data = trips.iter().flat_map(|t| self.row(t)).collect();
        Tensor2D::new(data, trips.len(), self.n_features())
    }

    /// One-hot on the categorical columns, numeric columns passed through.
    pub fn column_transformer<B: Backend>(
        &self,
        handle_unknown: HandleUnknown,
    ) -> ColumnTransformer<B> {
        ColumnTransformer::new()
            .add_one_hot_encoder(
                OneHotEncoder::new().with_handle_unknown(handle_unknown),
                ColumnSpec::Indices(Self::CATEGORICAL.to_vec()),
            )
            .with_remainder(Remainder::Passthrough)
    }

    /// Translates an encoder rejection back into domain terms.
    pub fn domain_error(&self, err: PreprocessingError) -> FareError {
        match err {
            PreprocessingError::UnknownCategory { column, value } => {
                let field = Self::COLUMNS.get(column).copied().unwrap_or("feature");
                let index = value as usize;
                let name = match column {
                    Self::STATION => Station::from_index(index).map(|s| s.to_string()),
                    Self::SEASON => Season::from_index(index).map(|s| s.to_string()),
                    Self::BAG_SIZE => BagSize::from_index(index).map(|s| s.to_string()),
                    _ => None,
                };
                FareError::UnsupportedCategory {
                    field,
                    value: name.unwrap_or_else(|| value.to_string()),
                }
            }
            other => FareError::Preprocessing(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::preprocessing::{FittedTransformer, Transformer};

    fn trip(station: Station, season: Season, size: BagSize) -> TripRecord {
        TripRecord::new(station, 3, season, 2, 40, size, 120).unwrap()
    }

    #[test]
    fn test_row_layout() {
        let row = FeatureSchema.row(&trip(Station::Howrah, Season::Festival, BagSize::Large));
        assert_eq!(row, vec![2.0, 3.0, 3.0, 2.0, 40.0, 2.0, 120.0]);
    }

    #[test]
    fn test_full_level_set_encodes_to_sixteen_columns() {
        let trips: Vec<TripRecord> = (0..60)
            .map(|i| {
                trip(
                    Station::ALL[i % 5],
                    Season::ALL[i % 4],
                    BagSize::ALL[i % 3],
                )
            })
            .collect();
        let x = FeatureSchema.matrix::<CpuBackend>(&trips);
        let fitted = FeatureSchema
            .column_transformer::<CpuBackend>(HandleUnknown::Error)
            .fit(&x)
            .unwrap();
        assert_eq!(fitted.n_features_out(), 16);
    }

    #[test]
    fn test_domain_error_names_the_level() {
        let err = FeatureSchema.domain_error(PreprocessingError::UnknownCategory {
            column: FeatureSchema::STATION,
            value: 4.0,
        });
        assert_eq!(
            err,
            FareError::UnsupportedCategory {
                field: "station",
                value: "Bengaluru City".to_string()
            }
        );
    }

    #[test]
    fn test_domain_error_passes_other_errors() {
        let err = FeatureSchema.domain_error(PreprocessingError::EmptyData("x".into()));
        assert!(matches!(err, FareError::Preprocessing(_)));
    }
}

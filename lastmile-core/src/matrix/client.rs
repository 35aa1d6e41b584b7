//! Normalising wrapper around a [`DistanceMatrixProvider`].

use crate::Coordinate;

use super::error::ProviderFailure;
use super::provider::{DistanceMatrixProvider, ProviderMatrix, TravelEstimate};

/// Travel between one origin and one destination in route units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixCell {
    /// Distance in kilometres.
    pub distance_km: f64,
    /// Duration in whole minutes.
    pub duration_min: u32,
    /// False when this specific pair cannot be routed.
    pub ok: bool,
}

impl MatrixCell {
    /// Cell for a pair the provider could not route.
    pub const UNROUTABLE: Self = Self {
        distance_km: 0.0,
        duration_min: 0,
        ok: false,
    };

    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "unit conversion from metres and seconds; inputs are checked to be finite and non-negative"
    )]
    fn from_estimate(estimate: Option<TravelEstimate>) -> Self {
        let usable = |value: f64| value.is_finite() && value >= 0.0;
        match estimate {
            Some(TravelEstimate {
                distance_meters,
                duration_secs,
            }) if usable(distance_meters) && usable(duration_secs) => Self {
                distance_km: distance_meters / 1000.0,
                // Saturating cast: absurdly long durations clamp to u32::MAX.
                duration_min: (duration_secs / 60.0).round() as u32,
                ok: true,
            },
            _ => Self::UNROUTABLE,
        }
    }
}

/// Dense `origins × destinations` grid of [`MatrixCell`] values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    columns: usize,
    cells: Vec<MatrixCell>,
}

impl Matrix {
    /// Number of origins.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len().checked_div(self.columns).unwrap_or(0)
    }

    /// Number of destinations.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Cell for `origin` → `destination`, if both indices are in range.
    #[must_use]
    pub fn get(&self, origin: usize, destination: usize) -> Option<&MatrixCell> {
        self.row(origin)?.get(destination)
    }

    /// All cells leaving `origin`.
    #[must_use]
    pub fn row(&self, origin: usize) -> Option<&[MatrixCell]> {
        self.cells.chunks(self.columns.max(1)).nth(origin)
    }
}

/// Queries a provider and turns its answer into a validated [`Matrix`].
///
/// The client converts metres to kilometres and seconds to rounded minutes.
/// Missing, negative or non-finite values become unroutable cells. A
/// response whose shape differs from the request is a wholesale failure.
#[derive(Debug)]
pub struct DistanceMatrixClient<'a, P: ?Sized> {
    provider: &'a P,
}

impl<'a, P> DistanceMatrixClient<'a, P>
where
    P: DistanceMatrixProvider + ?Sized,
{
    /// Wrap `provider`.
    pub const fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Fetch the matrix from every origin to every destination.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderFailure::EmptyInput`] when either side is empty,
    /// [`ProviderFailure::MalformedResponse`] when the provider's matrix has
    /// the wrong shape, and passes through any provider failure.
    pub async fn matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Matrix, ProviderFailure> {
        if origins.is_empty() || destinations.is_empty() {
            return Err(ProviderFailure::EmptyInput);
        }
        let raw = self.provider.travel_matrix(origins, destinations).await?;
        normalise(raw, origins.len(), destinations.len())
    }
}

fn normalise(
    raw: ProviderMatrix,
    rows: usize,
    columns: usize,
) -> Result<Matrix, ProviderFailure> {
    if raw.len() != rows {
        return Err(ProviderFailure::MalformedResponse {
            message: format!("expected {rows} rows, got {}", raw.len()),
        });
    }
    if let Some((index, row)) = raw.iter().enumerate().find(|(_, row)| row.len() != columns) {
        return Err(ProviderFailure::MalformedResponse {
            message: format!(
                "expected {columns} columns in row {index}, got {}",
                row.len()
            ),
        });
    }

    let cells = raw
        .into_iter()
        .flatten()
        .map(MatrixCell::from_estimate)
        .collect();
    Ok(Matrix { columns, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn estimate(distance_meters: f64, duration_secs: f64) -> Option<TravelEstimate> {
        Some(TravelEstimate {
            distance_meters,
            duration_secs,
        })
    }

    #[rstest]
    fn normalise_converts_units() {
        let raw = vec![vec![estimate(1500.0, 90.0), estimate(0.0, 0.0)]];

        let matrix = normalise(raw, 1, 2).expect("should normalise");

        assert_eq!(matrix.rows(), 1);
        assert_eq!(matrix.columns(), 2);
        let cell = matrix.get(0, 0).expect("cell in range");
        assert!(cell.ok);
        assert!((cell.distance_km - 1.5).abs() < 1e-12);
        assert_eq!(cell.duration_min, 2);
        assert_eq!(matrix.get(0, 1).map(|cell| cell.ok), Some(true));
        assert!(matrix.get(1, 0).is_none());
    }

    #[rstest]
    #[case(None)]
    #[case(estimate(-1.0, 60.0))]
    #[case(estimate(100.0, f64::NAN))]
    #[case(estimate(f64::INFINITY, 60.0))]
    fn invalid_cells_are_unroutable(#[case] cell: Option<TravelEstimate>) {
        let matrix = normalise(vec![vec![cell]], 1, 1).expect("should normalise");
        assert_eq!(matrix.get(0, 0), Some(&MatrixCell::UNROUTABLE));
    }

    #[rstest]
    fn wrong_row_count_is_malformed() {
        let err = normalise(Vec::new(), 1, 1).expect_err("should fail");
        assert!(matches!(err, ProviderFailure::MalformedResponse { .. }));
    }

    #[rstest]
    fn ragged_rows_are_malformed() {
        let raw = vec![vec![estimate(1.0, 1.0)], vec![]];
        let err = normalise(raw, 2, 1).expect_err("should fail");
        match err {
            ProviderFailure::MalformedResponse { message } => assert!(message.contains("row 1")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[rstest]
    fn rows_are_addressable() {
        let raw = vec![
            vec![estimate(1000.0, 60.0), None],
            vec![None, estimate(2000.0, 120.0)],
        ];
        let matrix = normalise(raw, 2, 2).expect("should normalise");
        let second = matrix.row(1).expect("second row");
        assert!(!second.first().expect("first column").ok);
        assert_eq!(second.get(1).map(|cell| cell.duration_min), Some(2));
    }
}

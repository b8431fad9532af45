//! Explicit boundary between tabular input and the clustering engine.
//!
//! A [`FeatureSchema`] names the columns of a [`Table`] that are used as clustering features. It is validated
//! once, when the samples are extracted, so that everything past [`FeatureSchema::extract`] only ever sees a
//! consistent, finite, row-major [`KMeans`] dataset.

use crate::{memory::Primitive, KMeans, KMeansError};
use log::debug;

/// A single named column of a [`Table`].
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}
impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Text(values) => values.len(),
        }
    }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
    pub fn is_numeric(&self) -> bool { matches!(self, Column::Numeric(_)) }
}

/// Column-oriented table, in the order the columns were added.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
}
impl Table {
    pub fn new() -> Self { Self::default() }

    /// Add (or replace) the column **name**.
    pub fn push(&mut self, name: impl Into<String>, column: Column) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = column,
            None => self.columns.push((name, column)),
        }
    }

    pub fn with_numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.push(name, Column::Numeric(values));
        self
    }

    pub fn with_text(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.push(name, Column::Text(values));
        self
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column_cnt(&self) -> usize { self.columns.len() }
}

/// Ordered list of the columns that make up a sample's feature vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureSchema {
    features: Vec<String>,
}
impl FeatureSchema {
    /// Schema using the columns **names**, in the given order. The feature dimension `i` of every sample
    /// is taken from column `names[i]`.
    ///
    /// ## Errors
    /// [`KMeansError::InvalidConfig`] if **names** is empty or contains a column twice.
    pub fn new<I, S>(names: I) -> Result<Self, KMeansError> where I: IntoIterator<Item = S>, S: Into<String> {
        let features: Vec<String> = names.into_iter().map(Into::into).collect();
        if features.is_empty() {
            return Err(KMeansError::InvalidConfig("feature schema without features".to_string()));
        }
        if let Some(dup) = features.iter().enumerate().find(|(i, f)| features[..*i].contains(f)) {
            return Err(KMeansError::InvalidConfig(format!("feature `{}` listed twice", dup.1)));
        }
        Ok(Self { features })
    }

    /// Schema using every numeric column of **table**, in table order.
    pub fn numeric_columns(table: &Table) -> Result<Self, KMeansError> {
        Self::new(table.columns.iter().filter(|(_, c)| c.is_numeric()).map(|(n, _)| n.clone()))
    }

    pub fn names(&self) -> &[String] { &self.features }

    /// Dimensionality of the extracted samples.
    pub fn dims(&self) -> usize { self.features.len() }

    /// Extract the samples described by this schema from **table**.
    ///
    /// ## Errors
    /// - [`KMeansError::UnknownFeature`] if a feature column does not exist
    /// - [`KMeansError::NonNumericFeature`] if a feature column is not numeric
    /// - [`KMeansError::ColumnLengthMismatch`] if the feature columns differ in length
    /// - [`KMeansError::NonFiniteValue`] / [`KMeansError::EmptyDataset`] as validated by [`KMeans::new`]
    pub fn extract<T: Primitive>(&self, table: &Table) -> Result<KMeans<T>, KMeansError> {
        let columns = self.features.iter()
            .map(|name| match table.column(name) {
                None => Err(KMeansError::UnknownFeature(name.clone())),
                Some(Column::Text(_)) => Err(KMeansError::NonNumericFeature(name.clone())),
                Some(Column::Numeric(values)) => Ok((name, values)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sample_cnt = columns[0].1.len();
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != sample_cnt) {
            return Err(KMeansError::ColumnLengthMismatch { column: (*name).clone(), expected: sample_cnt, actual: values.len() });
        }

        let sample_dims = columns.len();
        let mut samples = vec![T::zero(); sample_cnt * sample_dims];
        for (dim, (_, values)) in columns.iter().enumerate() {
            for (sample, &v) in values.iter().enumerate() {
                samples[sample * sample_dims + dim] = T::from(v).ok_or(KMeansError::NonFiniteValue { sample, dim })?;
            }
        }
        debug!("extracted {} samples with features {:?}", sample_cnt, self.features);
        KMeans::new(samples, sample_cnt, sample_dims)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn customers() -> Table {
        Table::new()
            .with_text("region", vec!["north".into(), "south".into(), "east".into()])
            .with_numeric("income", vec![40.0, 55.5, 72.0])
            .with_numeric("age", vec![31.0, 45.0, 27.0])
            .with_numeric("visits", vec![3.0, 12.0, 7.0])
    }

    #[test]
    fn extracts_row_major() {
        let schema = FeatureSchema::new(["age", "income"]).unwrap();
        let kmean: KMeans<f64> = schema.extract(&customers()).unwrap();
        assert_eq!(kmean.sample_cnt(), 3);
        assert_eq!(kmean.sample_dims(), 2);
        assert_eq!(kmean.sample(0), &[31.0, 40.0]);
        assert_eq!(kmean.sample(2), &[27.0, 72.0]);
    }

    #[test]
    fn numeric_columns_skip_text() {
        let table = customers();
        let schema = FeatureSchema::numeric_columns(&table).unwrap();
        assert_eq!(schema.names(), &["income", "age", "visits"]);
        let kmean: KMeans<f32> = schema.extract(&table).unwrap();
        assert_eq!(kmean.sample(1), &[55.5, 45.0, 12.0]);

        let only_text = Table::new().with_text("name", vec!["a".into()]);
        assert!(matches!(FeatureSchema::numeric_columns(&only_text), Err(KMeansError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_invalid_columns() {
        let table = customers();
        let err = FeatureSchema::new(["age", "height"]).unwrap().extract::<f64>(&table).unwrap_err();
        assert_eq!(err, KMeansError::UnknownFeature("height".into()));
        let err = FeatureSchema::new(["region"]).unwrap().extract::<f64>(&table).unwrap_err();
        assert_eq!(err, KMeansError::NonNumericFeature("region".into()));

        let ragged = customers().with_numeric("spend", vec![1.0, 2.0]);
        let err = FeatureSchema::new(["age", "spend"]).unwrap().extract::<f64>(&ragged).unwrap_err();
        assert_eq!(err, KMeansError::ColumnLengthMismatch { column: "spend".into(), expected: 3, actual: 2 });

        let holes = customers().with_numeric("spend", vec![1.0, f64::NAN, 2.0]);
        let err = FeatureSchema::new(["age", "spend"]).unwrap().extract::<f64>(&holes).unwrap_err();
        assert_eq!(err, KMeansError::NonFiniteValue { sample: 1, dim: 1 });
    }

    #[test]
    fn rejects_invalid_schemas() {
        assert!(FeatureSchema::new(Vec::<String>::new()).is_err());
        assert!(FeatureSchema::new(["age", "age"]).is_err());
        let empty = Table::new().with_numeric("age", vec![]);
        assert_eq!(FeatureSchema::new(["age"]).unwrap().extract::<f64>(&empty).unwrap_err(), KMeansError::EmptyDataset);
    }

    #[test]
    fn replaces_columns() {
        let mut table = customers();
        table.push("age", Column::Numeric(vec![1.0, 2.0, 3.0]));
        assert_eq!(table.column_cnt(), 4);
        assert_eq!(table.column("age"), Some(&Column::Numeric(vec![1.0, 2.0, 3.0])));
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["region", "income", "age", "visits"]);
    }
}

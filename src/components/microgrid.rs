//! The microgrid aggregate: project, load, generator, storage and renewable sources.

use indexmap::IndexMap;

use super::{Battery, DispatchableGenerator, NonDispatchable, Project};
use crate::error::{MicrogridError, Result};

/// A complete islanded microgrid description.
///
/// Sources are kept in insertion order, which is the order used in cost
/// tables and reports.
#[derive(Debug)]
pub struct Microgrid {
    /// Project-wide parameters.
    pub project: Project,
    /// Desired load time series (kW), one sample per timestep.
    pub load: Vec<f64>,
    /// Dispatchable generator.
    pub generator: DispatchableGenerator,
    /// Energy storage.
    pub storage: Battery,
    /// Non-dispatchable sources, keyed by a unique name.
    pub nondispatchables: IndexMap<String, Box<dyn NonDispatchable>>,
}

impl Microgrid {
    /// Creates a microgrid without renewable sources.
    pub fn new(
        project: Project,
        load: Vec<f64>,
        generator: DispatchableGenerator,
        storage: Battery,
    ) -> Self {
        Self {
            project,
            load,
            generator,
            storage,
            nondispatchables: IndexMap::new(),
        }
    }

    /// Adds a named source, replacing any source of the same name.
    pub fn with_source(
        mut self,
        name: impl Into<String>,
        source: impl NonDispatchable + 'static,
    ) -> Self {
        self.add_source(name, Box::new(source));
        self
    }

    /// Adds a boxed named source, replacing any source of the same name.
    ///
    /// Returns the replaced source, if any.
    pub fn add_source(
        &mut self,
        name: impl Into<String>,
        source: Box<dyn NonDispatchable>,
    ) -> Option<Box<dyn NonDispatchable>> {
        self.nondispatchables.insert(name.into(), source)
    }

    /// Number of simulation steps (length of the load series).
    pub fn steps(&self) -> usize {
        self.load.len()
    }

    /// Total desired load energy (kWh).
    pub fn load_energy(&self) -> f64 {
        self.load.iter().sum::<f64>() * self.project.timestep
    }

    /// Checks every component and the consistency of all time series.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: an invalid parameter of any
    /// component, a non-finite load or production sample, an empty source
    /// name, or a source production series whose length differs from the load.
    pub fn validate(&self) -> Result<()> {
        self.project.validate()?;
        if let Some((k, value)) = self.load.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(MicrogridError::invalid(
                format!("load[{k}]"),
                format!("must be finite, got {value}"),
            ));
        }
        self.generator.validate()?;
        self.storage.validate()?;

        let expected = self.steps();
        for (name, source) in &self.nondispatchables {
            if name.trim().is_empty() {
                return Err(MicrogridError::invalid(
                    "nondispatchables",
                    "source names must not be empty",
                ));
            }
            source.validate(name)?;
            let production = source.production();
            if production.len() != expected {
                return Err(MicrogridError::LengthMismatch {
                    name: name.clone(),
                    expected,
                    actual: production.len(),
                });
            }
            let non_finite = production.iter().enumerate().find(|(_, v)| !v.is_finite());
            if let Some((k, value)) = non_finite {
                return Err(MicrogridError::invalid(
                    format!("{name}[{k}]"),
                    format!("production must be finite, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

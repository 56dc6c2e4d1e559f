//! RocketBuilder, a fluent wrapper for scripting airframe scenarios.
//!
//! Drives the real `Engine` mutators against `MockKernel`, with
//! string names instead of component ids for readability.

use std::collections::HashMap;

use component_engine::{Component, ComponentId, Engine};
use geometry_kernel::{GeometryKernel, MockKernel, SolidHandle};
use rocket_types::BoundingBox;

use crate::helpers::HarnessError;

/// A named-component view over the engine for integration scenarios.
pub struct RocketBuilder {
    pub engine: Engine,
    pub kernel: MockKernel,
    named: HashMap<String, ComponentId>,
}

impl RocketBuilder {
    /// Engine with an empty rocket; the root answers to `"rocket"`.
    pub fn new() -> Self {
        let engine = Engine::new("harness rocket");
        let root = engine.root();
        let mut named = HashMap::new();
        named.insert("rocket".to_string(), root);
        Self {
            engine,
            kernel: MockKernel::new(),
            named,
        }
    }

    /// Attach `component` as the last stored child of the named parent.
    /// Remember: stage children are stored aft first.
    pub fn add(
        &mut self,
        parent: &str,
        name: &str,
        component: Component,
    ) -> Result<ComponentId, HarnessError> {
        self.add_at_end(parent, name, component, true)
    }

    /// Attach at index 0 of the stored child list (the aft end of a
    /// stage's stack).
    pub fn add_aft(
        &mut self,
        parent: &str,
        name: &str,
        component: Component,
    ) -> Result<ComponentId, HarnessError> {
        self.add_at_end(parent, name, component, false)
    }

    fn add_at_end(
        &mut self,
        parent: &str,
        name: &str,
        component: Component,
        last: bool,
    ) -> Result<ComponentId, HarnessError> {
        if self.named.contains_key(name) {
            return Err(HarnessError::DuplicateName {
                name: name.to_string(),
            });
        }
        let parent = self.id(parent)?;
        let id = if last {
            self.engine.add_child(parent, component, &mut self.kernel)?
        } else {
            self.engine
                .add_child_at(parent, component, 0, &mut self.kernel)?
        };
        self.named.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn id(&self, name: &str) -> Result<ComponentId, HarnessError> {
        self.named
            .get(name)
            .copied()
            .ok_or_else(|| HarnessError::ComponentNotFound {
                name: name.to_string(),
            })
    }

    pub fn component(&self, name: &str) -> Result<&Component, HarnessError> {
        Ok(self.engine.component(self.id(name)?)?)
    }

    /// Parent-relative axial position.
    pub fn position(&self, name: &str) -> Result<f64, HarnessError> {
        Ok(self.component(name)?.position)
    }

    pub fn fore_diameter(&mut self, name: &str) -> Result<f64, HarnessError> {
        let id = self.id(name)?;
        Ok(self.engine.fore_diameter(id)?)
    }

    pub fn aft_diameter(&mut self, name: &str) -> Result<f64, HarnessError> {
        let id = self.id(name)?;
        Ok(self.engine.aft_diameter(id)?)
    }

    /// Bounding box of the component's last committed solid.
    pub fn bounding_box(&self, name: &str) -> Result<BoundingBox, HarnessError> {
        let solid = self.solid(name)?;
        Ok(self.kernel.bounding_box(&solid)?)
    }

    pub fn solid(&self, name: &str) -> Result<SolidHandle, HarnessError> {
        self.component(name)?
            .geometry
            .ok_or_else(|| HarnessError::NoSolid {
                name: name.to_string(),
            })
    }

    // ── Inline Assertions ───────────────────────────────────────────────

    pub fn assert_has_solid(&self, name: &str) -> Result<(), HarnessError> {
        let comp = self.component(name)?;
        if let Some(detail) = &comp.shape_error {
            return Err(HarnessError::ShapeError {
                name: name.to_string(),
                detail: detail.clone(),
            });
        }
        self.solid(name).map(|_| ())
    }

    pub fn assert_shape_error(&self, name: &str) -> Result<(), HarnessError> {
        if self.component(name)?.shape_error.is_some() {
            Ok(())
        } else {
            Err(HarnessError::AssertionFailed {
                detail: format!("[{name}] expected a shape error, recompute succeeded"),
            })
        }
    }
}

impl Default for RocketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

use std::fmt;
use std::sync::Arc;

use qchip_core::OptionsModel;

use crate::backend::{RenderBackend, RenderContext};
use crate::descriptor::RendererDescriptor;
use crate::design::DesignHandle;
use crate::error::RendererError;
use crate::identity::RendererId;

/// Lifecycle of a bound renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    NotInitialized,
    InitCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The setup hook ran and succeeded.
    Initiated,
    /// Setup had already been attempted and `force` was not set.
    Skipped,
}

/// One renderer bound to one design.
pub struct RendererInstance {
    pub(crate) descriptor: Arc<RendererDescriptor>,
    pub(crate) design: DesignHandle,
    pub(crate) options: OptionsModel,
    status: RendererStatus,
    /// Set on the first setup attempt, successful or not.
    initiated: bool,
    pub(crate) backend: Box<dyn RenderBackend>,
}

impl RendererInstance {
    pub(crate) fn bind(descriptor: Arc<RendererDescriptor>, design: DesignHandle, options: OptionsModel) -> Self {
        let backend = descriptor.create_backend();
        Self {
            descriptor,
            design,
            options,
            status: RendererStatus::NotInitialized,
            initiated: false,
            backend,
        }
    }

    pub fn identity(&self) -> &RendererId {
        self.descriptor.identity()
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &RendererDescriptor {
        &self.descriptor
    }

    pub fn design(&self) -> &DesignHandle {
        &self.design
    }

    pub fn options(&self) -> &OptionsModel {
        &self.options
    }

    /// Per-instance overrides. The design's template is not affected.
    pub fn options_mut(&mut self) -> &mut OptionsModel {
        &mut self.options
    }

    pub fn status(&self) -> RendererStatus {
        self.status
    }

    pub fn is_initiated(&self) -> bool {
        self.initiated
    }

    /// Run the backend's one-time setup.
    ///
    /// Without `force`, a second call is skipped. A failed setup still sets
    /// the latch; retrying requires `force`.
    pub fn initiate(&mut self, force: bool) -> Result<InitOutcome, RendererError> {
        if self.initiated && !force {
            log::debug!("Renderer '{}' already initiated, skipping setup", self.descriptor.identity());
            return Ok(InitOutcome::Skipped);
        }
        self.initiated = true;

        let design = self.design.read();
        let ctx = RenderContext::new(&self.descriptor, &self.options, &*design);
        match self.backend.initiate_renderer(&ctx) {
            Ok(()) => {
                self.status = RendererStatus::InitCompleted;
                log::info!("Renderer '{}' initiated", self.descriptor.identity());
                Ok(InitOutcome::Initiated)
            }
            Err(source) => {
                log::error!("Renderer '{}' setup failed: {}", self.descriptor.identity(), source);
                Err(RendererError::InitializationFailed {
                    identity: self.descriptor.identity().clone(),
                    source: Box::new(source),
                })
            }
        }
    }
}

impl fmt::Debug for RendererInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererInstance")
            .field("identity", self.descriptor.identity())
            .field("status", &self.status)
            .field("initiated", &self.initiated)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

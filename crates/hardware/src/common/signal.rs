//! Tristate pin modelling.
//!
//! HyperBus DQ and RWDS lines are shared between controller and device. The controller
//! side is modelled as an output value plus an explicit output-enable; the device side as
//! an optional drive. `resolve` combines both into the level seen on the wire.

/// One side of a bidirectional pin group: a driven value and its output-enable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tristate<T> {
    /// Value presented to the pad when `oe` is set.
    pub o: T,
    /// Output-enable; the pad is high impedance when clear.
    pub oe: bool,
}

impl<T: Copy> Tristate<T> {
    /// A released pin group holding `o` in its output register.
    pub const fn released(o: T) -> Self {
        Self { o, oe: false }
    }

    /// The driven value, or `None` while released.
    pub const fn driven(&self) -> Option<T> {
        if self.oe { Some(self.o) } else { None }
    }
}

/// Level on a shared line group after combining both drivers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolved<T> {
    /// Value seen by both receivers.
    pub value: T,
    /// Both sides were driving at once.
    pub contention: bool,
}

/// Resolves a controller tristate against an optional device drive.
///
/// Undriven lines read as `T::default()` (zero). On contention the controller wins,
/// which is what the controller's own input stage would observe through its output buffer.
pub fn resolve<T: Copy + Default>(host: Tristate<T>, device: Option<T>) -> Resolved<T> {
    match (host.driven(), device) {
        (Some(v), Some(_)) => Resolved {
            value: v,
            contention: true,
        },
        (Some(v), None) | (None, Some(v)) => Resolved {
            value: v,
            contention: false,
        },
        (None, None) => Resolved::default(),
    }
}

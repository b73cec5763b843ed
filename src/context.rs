use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use crate::device::{self, DeviceList, Guid, Selector};
use crate::driver::Driver;
use crate::error::{Error, Result};

type Connect<D> = Box<dyn Fn() -> Result<D> + Send + Sync>;

struct State<D> {
    refs: usize,
    driver: Option<D>,
    /// GUIDs with a live device handle
    held: HashSet<Guid>,
}

/// Reference counted owner of the bus driver handle
///
/// The driver is created when the first lease is taken and destroyed when the last lease is
/// dropped, so exactly one driver handle exists while any camera session is alive. A camera can
/// only be held by one lease at a time.
pub struct Context<D: Driver> {
    connect: Connect<D>,
    state: Mutex<State<D>>,
}

impl<D: Driver> Context<D> {
    /// Returns a context that creates its driver with `connect`
    ///
    /// # Arguments
    ///
    /// * `connect` - Driver constructor, called on every 0 -> 1 lease transition
    pub fn new<F>(connect: F) -> Arc<Self>
    where
        F: Fn() -> Result<D> + Send + Sync + 'static,
    {
        Arc::new(Context {
            connect: Box::new(connect),
            state: Mutex::new(State {
                refs: 0,
                driver: None,
                held: HashSet::new(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, State<D>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a reference on the driver, creating it if this is the first one
    pub fn acquire(self: &Arc<Self>) -> Result<Lease<D>> {
        let mut state = self.lock();
        if state.refs == 0 {
            debug!("Creating IEEE-1394 bus context.");
            match (self.connect)() {
                Ok(driver) => {
                    state.driver = Some(driver);
                    state.held.clear();
                }
                Err(e) => {
                    error!("Failed to create IEEE-1394 bus context: {}", e);
                    return Err(e);
                }
            }
        }
        state.refs += 1;

        Ok(Lease {
            context: Arc::clone(self),
            device: None,
        })
    }

    fn release(&self) {
        let mut state = self.lock();
        state.refs = state.refs.saturating_sub(1);
        if state.refs == 0 && state.driver.is_some() {
            debug!("No more cameras, destroying IEEE-1394 bus context.");
            state.driver = None;
        }
    }

    fn claim(&self, guid: Guid) -> Result<D::Device> {
        let mut state = self.lock();
        if state.held.contains(&guid) {
            return Err(Error::DeviceBusy(guid));
        }
        let device = match state.driver.as_ref() {
            Some(driver) => driver.open(guid)?,
            None => return Err(Error::ContextReleased),
        };
        state.held.insert(guid);
        Ok(device)
    }

    fn unclaim(&self, guid: Guid) {
        self.lock().held.remove(&guid);
    }

    /// Whether a session currently holds the camera with `guid`
    pub fn is_held(&self, guid: Guid) -> bool {
        self.lock().held.contains(&guid)
    }

    /// Number of outstanding leases
    pub fn refs(&self) -> usize {
        self.lock().refs
    }

    /// Whether a driver handle currently exists
    pub fn is_connected(&self) -> bool {
        self.lock().driver.is_some()
    }

    fn with_driver<R>(&self, f: impl FnOnce(&D) -> Result<R>) -> Result<R> {
        let state = self.lock();
        match state.driver.as_ref() {
            Some(driver) => f(driver),
            None => Err(Error::ContextReleased),
        }
    }
}

impl<D: Driver> fmt::Debug for Context<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Context")
            .field("refs", &state.refs)
            .field("connected", &state.driver.is_some())
            .finish()
    }
}

/// One reference on a [`Context`], released on drop
///
/// A lease holds at most one camera at a time.
pub struct Lease<D: Driver> {
    context: Arc<Context<D>>,
    device: Option<Guid>,
}

impl<D: Driver> Lease<D> {
    pub fn context(&self) -> &Arc<Context<D>> {
        &self.context
    }

    /// Takes a fresh snapshot of the attached cameras
    pub fn devices(&self) -> Result<DeviceList> {
        self.context.with_driver(|driver| DeviceList::new(driver))
    }

    /// Resolves `selector` against the bus
    pub fn resolve(&self, selector: Selector) -> Result<Guid> {
        self.context
            .with_driver(|driver| device::resolve(driver, selector))
    }

    /// Creates the device handle for `guid`
    ///
    /// Fails with [`Error::DeviceBusy`] while another lease holds the camera. A camera this lease
    /// held before is given up first.
    pub fn open(&mut self, guid: Guid) -> Result<D::Device> {
        self.release_device();
        let device = self.context.claim(guid)?;
        self.device = Some(guid);
        Ok(device)
    }

    /// Gives up the camera, its device handle must already be dropped
    pub fn release_device(&mut self) {
        if let Some(guid) = self.device.take() {
            self.context.unclaim(guid);
        }
    }
}

impl<D: Driver> Drop for Lease<D> {
    fn drop(&mut self) {
        self.release_device();
        self.context.release();
    }
}

impl<D: Driver> fmt::Debug for Lease<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("context", &self.context)
            .field("device", &self.device)
            .finish()
    }
}

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::codec::{self, BoolEncoding};
use crate::error::ScpiError;
use crate::transport::ScpiTransport;

/// Shared handle to the single transport of one instrument.
///
/// Every mode, measurement and menu holds a clone of the same channel, so all
/// traffic of an instrument goes through one ordered connection. The handle is
/// `Rc` based and therefore bound to the thread that created it.
#[derive(Clone)]
pub struct ScpiChannel {
    transport: Rc<RefCell<Box<dyn ScpiTransport>>>,
}

impl ScpiChannel {
    pub fn new<T: ScpiTransport + 'static>(transport: T) -> Self {
        Self::from_boxed(Box::new(transport))
    }

    pub fn from_boxed(transport: Box<dyn ScpiTransport>) -> Self {
        Self {
            transport: Rc::new(RefCell::new(transport)),
        }
    }

    pub fn command(&self, command: &str) -> Result<(), ScpiError> {
        log::debug!("-> {}", command);
        self.transport.borrow_mut().send(command)?;
        Ok(())
    }

    pub fn query(&self, query: &str) -> Result<String, ScpiError> {
        log::debug!("-> {}", query);
        let response = self.transport.borrow_mut().query(query)?;
        log::trace!("<- {:?}", response);
        Ok(response)
    }

    /// True if both handles point at the same transport.
    pub fn same_channel(&self, other: &ScpiChannel) -> bool {
        Rc::ptr_eq(&self.transport, &other.transport)
    }
}

impl fmt::Debug for ScpiChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScpiChannel")
            .field("handles", &Rc::strong_count(&self.transport))
            .finish()
    }
}

/// Base behavior of everything that talks to the instrument.
///
/// `header` arguments are SCPI headers without the trailing `?`; the helpers
/// append the value or the query marker.
pub trait ScpiNode {
    fn channel(&self) -> &ScpiChannel;

    fn command(&self, command: &str) -> Result<(), ScpiError> {
        self.channel().command(command)
    }

    fn query(&self, query: &str) -> Result<String, ScpiError> {
        self.channel().query(query)
    }

    fn write_value<V: fmt::Display>(&self, header: &str, value: V) -> Result<(), ScpiError>
    where
        Self: Sized,
    {
        self.command(&format!("{} {}", header, value))
    }

    fn write_bool(&self, header: &str, value: bool, encoding: BoolEncoding) -> Result<(), ScpiError> {
        self.command(&format!("{} {}", header, encoding.encode(value)))
    }

    fn read_clean(&self, header: &str) -> Result<String, ScpiError> {
        let response = self.query(&format!("{}?", header))?;
        Ok(codec::clean_response(&response).to_string())
    }

    fn read_f64(&self, header: &str) -> Result<f64, ScpiError> {
        codec::parse_f64(&self.query(&format!("{}?", header))?)
    }

    fn read_bool(&self, header: &str, encoding: BoolEncoding) -> Result<bool, ScpiError> {
        Ok(encoding.decode(&self.query(&format!("{}?", header))?))
    }
}

impl ScpiNode for ScpiChannel {
    fn channel(&self) -> &ScpiChannel {
        self
    }
}

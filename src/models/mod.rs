//! The models module provides the prebuilt devices of a queueing pipeline:
//! a `Generator` of arriving transacts, a FIFO `Queue`, and a single-slot
//! `Processor`.  Additionally, this module specifies the requirements of
//! any additional custom devices, via the `Device` and `Reportable` traits.

use serde::{Deserialize, Serialize};

pub mod clock;
pub mod generator;
pub mod model_trait;
pub mod notify;
pub mod processor;
pub mod queue;
pub mod report;

pub use self::clock::Clock;
pub use self::generator::Generator;
pub use self::model_trait::{Device, Reportable, ReportableDevice};
pub use self::notify::{Handler, Subscribers, SubscriptionId};
pub use self::processor::Processor;
pub use self::queue::Queue;
pub use self::report::{
    CustomReport, DeviceReport, GeneratorReport, ProcessorReport, QueueReport,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub tick: u64,
    pub action: String,
    pub subject: String,
}

mod chart_component;
mod chart_host;
mod component_config;
mod dual_view_coordinator;
mod layout_observer;
mod message_contract;
mod update_reducer;
mod viewport_cache;

pub use chart_component::ChartComponent;
pub use chart_host::ChartHost;
pub use component_config::{ChartComponentConfig, OverlayClosePolicy};
pub use dual_view_coordinator::{DualViewCoordinator, SlotOutcome, SlotState, UpdateDispatch};
pub use layout_observer::LayoutObserver;
pub use message_contract::{AddressedMessage, BroadcastMessage};
pub use update_reducer::{Reduced, UpdateMessage, UpdateReducer, reduce};
pub use viewport_cache::ViewportStateCache;

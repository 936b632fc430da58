//! Application services - Use case implementations

pub mod itinerary;
pub mod map_view;
pub mod session;
mod trip_service;
pub mod trip_summary;

pub use itinerary::{ItineraryRow, format_duration, format_itinerary};
pub use map_view::{MapBounds, MapMarker, MapStyle, MapView, MarkerKind, RouteLine, build_map_view};
pub use session::{
    CoordinateInput, InputMode, Notice, NoticeLevel, SessionDefaults, TripOptions, TripPlan,
    TripSession, TripStop, WaypointEditor,
};
pub use trip_service::{Dashboard, RouteOption, TripService, fuel_error_notice};
pub use trip_summary::{TripSummary, VehicleProfile, summarize_trip};

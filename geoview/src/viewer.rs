//! The viewer session: load dispatch and the state a load changes.

use std::sync::Arc;

use geoview_types::{LatLngBounds, Size};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::bounds::compute_bounds;
use crate::config::ViewerConfig;
use crate::decoder::{DecodeContext, DecodeStage, DecoderSet, ProgressSink};
use crate::error::{GeoViewError, InputError};
use crate::layer::DataLayer;
use crate::messages::Message;
use crate::platform::ResourceLoader;
use crate::request::{FileType, LoadRequest};
use crate::status::{FeatureCount, FileInfoSummary, LoadStatus, StatusReporter};
use crate::view::{MapView, ViewController};

/// Viewer session.
///
/// Owns everything a load changes: the active layer, the cached data bounds, the map view and
/// the current status. All methods take `&self`, the state is guarded by a mutex that is never
/// held across an `.await`.
///
/// Only the latest dispatched request may change the state. If a new request is dispatched while
/// a previous one is still decoding, the result of the previous one is dropped when it finishes.
pub struct Viewer {
    config: ViewerConfig,
    loader: Arc<dyn ResourceLoader>,
    reporter: Arc<dyn StatusReporter>,
    decoders: DecoderSet,
    state: Mutex<ViewerState>,
}

struct ViewerState {
    load_sequence: u64,
    status: LoadStatus,
    file_info: Option<FileInfoSummary>,
    active_layer: Option<Arc<dyn DataLayer>>,
    data_bounds: Option<LatLngBounds>,
    controller: ViewController,
}

impl Viewer {
    /// Creates a new viewer with the built-in decoders.
    pub fn new(
        config: ViewerConfig,
        loader: Arc<dyn ResourceLoader>,
        reporter: Arc<dyn StatusReporter>,
    ) -> Self {
        let state = ViewerState {
            load_sequence: 0,
            status: LoadStatus::loading(Message::LoadingFile.text(config.locale)),
            file_info: None,
            active_layer: None,
            data_bounds: None,
            controller: ViewController::new(&config),
        };

        Self {
            config,
            loader,
            reporter,
            decoders: DecoderSet::default(),
            state: Mutex::new(state),
        }
    }

    /// Replaces the decoder table.
    pub fn with_decoders(mut self, decoders: DecoderSet) -> Self {
        self.decoders = decoders;
        self
    }

    /// Configuration of the viewer.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Current status.
    pub fn status(&self) -> LoadStatus {
        self.state.lock().status.clone()
    }

    /// Summary of the last successfully loaded file.
    pub fn file_info(&self) -> Option<FileInfoSummary> {
        self.state.lock().file_info.clone()
    }

    /// Layer of the last successfully loaded file.
    pub fn active_layer(&self) -> Option<Arc<dyn DataLayer>> {
        self.state.lock().active_layer.clone()
    }

    /// Valid bounds of the loaded data, if they were ever computed.
    pub fn data_bounds(&self) -> Option<LatLngBounds> {
        self.state.lock().data_bounds
    }

    /// Current map view.
    pub fn view(&self) -> MapView {
        self.state.lock().controller.view()
    }

    /// Sets the size of the map viewport.
    pub fn set_viewport_size(&self, size: Size) {
        self.state.lock().controller.set_size(size);
    }

    /// Moves the view to show all the loaded data, or to the default view if there is none.
    pub fn reset_view(&self) {
        let mut state = self.state.lock();
        let cached = state.data_bounds;
        let layer = state.active_layer.clone();
        state.controller.reset_view(cached, layer.as_deref());
    }

    /// Loads the requested file.
    ///
    /// The outcome is reported through the status: every path ends in either success or error,
    /// this method itself cannot fail.
    pub async fn dispatch(&self, request: LoadRequest) {
        let sequence = {
            let mut state = self.state.lock();
            state.load_sequence += 1;
            state.load_sequence
        };
        info!("Loading {} ({:?})", request.url(), request.declared_type());

        self.set_status(sequence, LoadStatus::loading(self.text(Message::LoadingFile)));

        let file_type = match self.resolve(&request) {
            Ok(file_type) => file_type,
            Err(err) => {
                warn!("Rejected load request: {err}");
                let message = match err {
                    InputError::EmptyUrl => Message::NoFileSpecified,
                    InputError::UnsupportedFormat(_) => Message::UnsupportedFormat,
                };
                self.set_status(sequence, LoadStatus::error(self.text(message)));
                return;
            }
        };

        let Some(decoder) = self.decoders.get(file_type) else {
            warn!("No decoder registered for {file_type}");
            self.set_status(
                sequence,
                LoadStatus::error(self.text(Message::UnsupportedFormat)),
            );
            return;
        };

        let progress = LoadProgress {
            viewer: self,
            sequence,
        };
        let ctx = DecodeContext::new(self.loader.as_ref(), self.config.capabilities, &progress);

        match decoder.decode(request.url(), &ctx).await {
            Ok(layer) => self.install(sequence, file_type, Arc::from(layer)),
            Err(err) => {
                warn!("Failed to load {}: {err}", request.url());
                let message = self.error_message(file_type, &err);
                self.set_status(sequence, LoadStatus::error(message));
            }
        }
    }

    fn resolve(&self, request: &LoadRequest) -> Result<FileType, InputError> {
        if request.url().trim().is_empty() {
            return Err(InputError::EmptyUrl);
        }

        request.declared_type().file_type()
    }

    fn install(&self, sequence: u64, file_type: FileType, layer: Arc<dyn DataLayer>) {
        let feature_count = match layer.features() {
            Some(features) => FeatureCount::Known(features.count()),
            None => FeatureCount::Unknown,
        };
        let outcome = compute_bounds(layer.as_ref());
        debug!("Layer loaded: {feature_count:?}, {outcome:?}");

        let summary = FileInfoSummary {
            file_type: file_type.display_name().to_string(),
            feature_count,
            bounds_available: outcome.bounds().is_some(),
        };
        let status = LoadStatus::success(self.text(Message::Loaded(file_type.display_name())));

        {
            let mut state = self.state.lock();
            if state.load_sequence != sequence {
                info!("Dropping result of the outdated load #{sequence}");
                return;
            }

            if let Some(bounds) = outcome.bounds() {
                state.data_bounds = Some(bounds);
            }
            if !state.controller.show(&outcome) {
                info!("Loaded data has no location, showing the default view");
                state.controller.set_default_view();
            }
            state.active_layer = Some(layer);
            state.status = status.clone();
            state.file_info = Some(summary.clone());
        }

        self.reporter.update_status(&status);
        self.reporter.display_file_info(&summary);
    }

    /// Changes the status if the load is still the current one.
    fn set_status(&self, sequence: u64, status: LoadStatus) {
        {
            let mut state = self.state.lock();
            if state.load_sequence != sequence {
                debug!("Ignoring status of the outdated load #{sequence}: {status}");
                return;
            }
            state.status = status.clone();
        }

        self.reporter.update_status(&status);
    }

    fn error_message(&self, file_type: FileType, err: &GeoViewError) -> String {
        match err {
            GeoViewError::CapabilityMissing(capability) => {
                self.text(Message::CapabilityMissing(*capability))
            }
            GeoViewError::Input(InputError::EmptyUrl) => self.text(Message::NoFileSpecified),
            GeoViewError::Input(InputError::UnsupportedFormat(_)) => {
                self.text(Message::UnsupportedFormat)
            }
            _ => format!(
                "{}: {err}",
                self.text(Message::LoadFailed(file_type.display_name()))
            ),
        }
    }

    fn text(&self, message: Message) -> String {
        message.text(self.config.locale)
    }
}

/// Turns decoder stage reports into loading messages of one load.
struct LoadProgress<'a> {
    viewer: &'a Viewer,
    sequence: u64,
}

impl ProgressSink for LoadProgress<'_> {
    fn stage(&self, file_type: FileType, stage: DecodeStage) {
        let name = file_type.display_name();
        let message = match stage {
            DecodeStage::Download => Message::Downloading(name),
            DecodeStage::Extract => Message::Extracting(name),
            DecodeStage::Decode => Message::Decoding(name),
            DecodeStage::Render => Message::Rendering,
        };

        self.viewer
            .set_status(self.sequence, LoadStatus::loading(self.viewer.text(message)));
    }
}

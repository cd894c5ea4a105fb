use std::cell::Cell;
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use serde::Serialize;
use strum::EnumString;

use super::config::TimelineConfig;
use super::memo::ClusterMemo;
use crate::domain::events::AnnouncementStore;
use crate::domain::logging::LogComponent;
use crate::domain::timeline::clustering::count_label;
use crate::domain::timeline::transform::value_domain_for_window;
use crate::domain::timeline::{
    AnimatedDomain, AxisDomain, Bounds, Category, ClaimRecord, Cluster, DataPoint,
    DomainAnimator, FocusDirection, FocusState, KeyValueStore, LinearScale, PersistedPosition,
    PixelRange, PositionStore, Projection, RovingFocus, TimeSource, TimeWindow, ValueScale,
    ValueScaleKind, Viewport, points_from_records, should_show_clusters,
};
use crate::time_utils::{axis_ticks, format_claim_date, format_time_label};
use crate::view_state::ViewportController;
use crate::{log_error, log_info};

/// DOM id prefix for rendered points: `claim-{id}`.
pub const POINT_ID_PREFIX: &str = "claim-";

/// Keys the timeline reacts to, by `KeyboardEvent.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum NavigationKey {
    #[strum(serialize = "ArrowLeft", serialize = "Left")]
    ArrowLeft,
    #[strum(serialize = "ArrowRight", serialize = "Right")]
    ArrowRight,
    Home,
    End,
    Enter,
    #[strum(serialize = " ", serialize = "Spacebar")]
    Space,
    #[strum(serialize = "Escape", serialize = "Esc")]
    Escape,
    #[strum(serialize = "+", serialize = "=")]
    ZoomIn,
    #[strum(serialize = "-")]
    ZoomOut,
    #[strum(serialize = "0")]
    ResetView,
    PageUp,
    PageDown,
}

/// What a key press did; anything but `Ignored` should suppress the
/// browser default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum KeyOutcome {
    Ignored,
    FocusMoved { index: usize, id: String },
    Activated { id: String },
    ExitedToContainer,
    ViewChanged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPoint {
    pub id: String,
    pub dom_id: String,
    pub x: f64,
    pub y: f64,
    pub tab_index: i32,
    pub focused: bool,
    pub aria_label: String,
    pub aria_description: String,
    pub color_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBadge {
    pub x: f64,
    pub y: f64,
    pub count: usize,
    pub label: String,
    pub color_key: String,
    pub member_ids: Vec<String>,
}

impl From<&Cluster> for ClusterBadge {
    fn from(cluster: &Cluster) -> Self {
        Self {
            x: cluster.centroid_x,
            y: cluster.centroid_y,
            count: cluster.size(),
            label: count_label(cluster.size()),
            color_key: cluster.primary_category.color_key().to_string(),
            member_ids: cluster.member_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub x: f64,
    pub label: String,
}

/// Everything the renderer needs for one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineFrame {
    pub viewport: Viewport,
    pub value_domain: AxisDomain,
    pub is_animating: bool,
    pub points: Vec<RenderedPoint>,
    pub clusters: Vec<ClusterBadge>,
    pub ticks: Vec<AxisTick>,
    pub focused_id: Option<String>,
}

/// `{source} — {Month D, YYYY}`
pub fn accessible_name(point: &DataPoint) -> String {
    format!("{} — {}", point.source_label, format_claim_date(point.timestamp))
}

/// `{claim preview}. Category: {category}`
pub fn accessible_description(point: &DataPoint, preview_chars: usize) -> String {
    let claim = point.claim.trim().trim_end_matches('.');
    let preview = if claim.chars().count() > preview_chars {
        let cut: String = claim.chars().take(preview_chars.saturating_sub(1)).collect();
        format!("{}…", cut.trim_end())
    } else {
        claim.to_string()
    };
    format!("{}. Category: {}", preview, point.category)
}

fn fallback_domain(kind: ValueScaleKind) -> AxisDomain {
    match kind {
        ValueScaleKind::Linear => AxisDomain::new(0.0, 1.0),
        ValueScaleKind::Log => AxisDomain::new(1.0, 10.0),
    }
}

/// Coordinates viewport, clustering, focus, value-axis animation and
/// persistence for one timeline.
pub struct TimelineService {
    config: TimelineConfig,
    all_points: Rc<[DataPoint]>,
    visible_points: Rc<[DataPoint]>,
    filters: BTreeSet<Category>,
    width: f64,
    height: f64,
    time_domain: AxisDomain,
    data_span_ms: f64,
    controller: ViewportController,
    focus: RovingFocus,
    pending_reveal: Rc<Cell<Option<usize>>>,
    /// Indices into `visible_points` that render as individual points.
    navigable: Vec<usize>,
    animator: DomainAnimator,
    memo: ClusterMemo,
    positions: PositionStore<Rc<dyn KeyValueStore>>,
    announcer: Rc<AnnouncementStore>,
}

impl TimelineService {
    pub fn new(
        mut points: Vec<DataPoint>,
        width: f64,
        height: f64,
        config: TimelineConfig,
        clock: Rc<dyn TimeSource>,
        storage: Rc<dyn KeyValueStore>,
        announcer: Rc<AnnouncementStore>,
    ) -> Self {
        points.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.timestamp, last.timestamp),
            _ => (0.0, 0.0),
        };
        let data_span_ms = last - first;
        let all_points: Rc<[DataPoint]> = points.into();

        let pending_reveal = Rc::new(Cell::new(None));
        let reveal_sink = Rc::clone(&pending_reveal);
        let focus = RovingFocus::new(all_points.len(), config.initial_focus_index, config.focus_wrap)
            .with_focus_change_hook(move |index| reveal_sink.set(Some(index)));

        let mut service = Self {
            controller: ViewportController::new(
                width,
                data_span_ms,
                Rc::clone(&clock),
                config.save_debounce_ms,
            ),
            animator: DomainAnimator::new(
                fallback_domain(config.value_scale),
                Rc::clone(&clock),
                config.animation_ms,
            ),
            positions: PositionStore::new(storage, clock),
            time_domain: AxisDomain::new(first, last).non_degenerate(),
            data_span_ms,
            visible_points: Rc::clone(&all_points),
            all_points,
            filters: BTreeSet::new(),
            width,
            height,
            focus,
            pending_reveal,
            navigable: Vec::new(),
            memo: ClusterMemo::new(),
            announcer,
            config,
        };
        service.refresh_value_target(false);
        service.sync_navigable();
        service
    }

    /// Build from content-store records, dropping invalid ones.
    pub fn from_records(
        records: Vec<ClaimRecord>,
        width: f64,
        height: f64,
        config: TimelineConfig,
        clock: Rc<dyn TimeSource>,
        storage: Rc<dyn KeyValueStore>,
        announcer: Rc<AnnouncementStore>,
    ) -> Self {
        Self::new(points_from_records(records), width, height, config, clock, storage, announcer)
    }

    /// Restore the saved view (if any) and enable focus-change side effects.
    pub fn mount(&mut self) -> Option<Viewport> {
        let bounds = self.controller.bounds();
        let restored = self
            .positions
            .load(bounds.min_scale, bounds.max_scale)
            .map(|position| self.controller.restore(&position));
        self.focus.mark_mounted();
        self.refresh_value_target(false);
        self.sync_navigable();
        if restored.is_some() {
            self.announcer.polite("Restored your previous timeline position");
        }
        log_info!(
            LogComponent::Application("Timeline"),
            "Mounted with {} claims (restored: {})",
            self.all_points.len(),
            restored.is_some()
        );
        restored
    }

    pub fn viewport(&self) -> Viewport {
        self.controller.viewport()
    }

    pub fn bounds(&self) -> Bounds {
        self.controller.bounds()
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    pub fn value_domain(&self) -> AnimatedDomain {
        self.animator.state()
    }

    pub fn announcer(&self) -> &Rc<AnnouncementStore> {
        &self.announcer
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn visible_count(&self) -> usize {
        self.visible_points.len()
    }

    pub fn cluster_computations(&self) -> usize {
        self.memo.computations()
    }

    pub fn projection(&self) -> Projection {
        let inset = self.config.plot_inset_px.clamp(0.0, self.width.max(0.0) / 2.0);
        let v_inset = self.config.plot_inset_px.clamp(0.0, self.height.max(0.0) / 2.0);
        Projection {
            time: LinearScale::new(self.time_domain, PixelRange::new(inset, self.width - inset)),
            value: ValueScale::new(
                self.config.value_scale,
                self.animator.state().domain,
                PixelRange::new(self.height - v_inset, v_inset),
            ),
        }
    }

    pub fn set_container_size(&mut self, width: f64, height: f64) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.controller.set_layout(width, self.data_span_ms);
        self.refresh_value_target(false);
        self.sync_navigable();
        self.reveal_pending();
    }

    /// Show only `categories`; an empty set shows everything.
    pub fn set_filters(&mut self, categories: impl IntoIterator<Item = Category>) {
        let filters: BTreeSet<Category> = categories.into_iter().collect();
        if filters == self.filters {
            return;
        }
        let focused_id = self.focused_point().map(|p| p.id.clone());
        // Indices into the old list are meaningless from here on.
        self.navigable.clear();
        self.visible_points = if filters.is_empty() {
            Rc::clone(&self.all_points)
        } else {
            self.all_points.iter().filter(|p| filters.contains(&p.category)).cloned().collect()
        };
        self.filters = filters;
        self.refresh_value_target(true);
        self.rebuild_navigable(focused_id);
        self.reveal_pending();
        self.announcer.polite(format!(
            "Showing {} of {} claims",
            self.visible_points.len(),
            self.all_points.len()
        ));
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.controller.zoom_in();
        self.after_discrete_zoom(changed)
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.controller.zoom_out();
        self.after_discrete_zoom(changed)
    }

    /// Pointer zoom (wheel/pinch) anchored at a container-relative point.
    pub fn zoom_at(&mut self, factor: f64, center_x: f64, center_y: f64) -> bool {
        let changed = self.controller.zoom_at_point(factor, center_x, center_y);
        if changed {
            self.after_view_change();
        }
        changed
    }

    pub fn pan_by(&mut self, delta_x: f64) -> bool {
        let changed = self.controller.pan_by(delta_x);
        if changed {
            self.after_view_change();
        }
        changed
    }

    /// Discrete pan by one fixed step towards earlier (`true`) or later claims.
    pub fn pan_step(&mut self, earlier: bool) -> bool {
        let changed =
            if earlier { self.controller.pan_left() } else { self.controller.pan_right() };
        if changed {
            self.after_view_change();
        }
        changed
    }

    pub fn reset_view(&mut self) -> bool {
        let changed = self.controller.reset();
        self.after_discrete_zoom(changed)
    }

    pub fn handle_key(&mut self, key: &str) -> KeyOutcome {
        let Ok(key) = key.parse::<NavigationKey>() else {
            return KeyOutcome::Ignored;
        };
        self.sync_navigable();
        match key {
            NavigationKey::ArrowLeft => self.navigate(FocusDirection::Previous),
            NavigationKey::ArrowRight => self.navigate(FocusDirection::Next),
            NavigationKey::Home => self.navigate(FocusDirection::First),
            NavigationKey::End => self.navigate(FocusDirection::Last),
            NavigationKey::Enter | NavigationKey::Space => match self.focused_point() {
                Some(point) => KeyOutcome::Activated { id: point.id.clone() },
                None => KeyOutcome::Ignored,
            },
            NavigationKey::Escape => KeyOutcome::ExitedToContainer,
            NavigationKey::ZoomIn => self.view_outcome(|s| s.zoom_in()),
            NavigationKey::ZoomOut => self.view_outcome(|s| s.zoom_out()),
            NavigationKey::ResetView => self.view_outcome(|s| s.reset_view()),
            NavigationKey::PageUp => self.view_outcome(|s| s.pan_step(true)),
            NavigationKey::PageDown => self.view_outcome(|s| s.pan_step(false)),
        }
    }

    /// Pointer focus on a rendered point.
    pub fn focus_point(&mut self, id: &str) -> Option<usize> {
        self.sync_navigable();
        let position =
            self.navigable.iter().position(|&p| self.visible_points[p].id == id)?;
        self.focus.focus_index(position)?;
        self.reveal_pending();
        self.focus.focused_index()
    }

    pub fn reset_focus(&mut self) -> Option<usize> {
        self.sync_navigable();
        let index = self.focus.reset_focus();
        self.reveal_pending();
        index
    }

    /// Advance animations and write any due save. Returns whether another
    /// frame is needed.
    pub fn tick(&mut self) -> bool {
        let animating = self.animator.tick();
        self.flush_persistence();
        animating
    }

    pub fn has_pending_save(&self) -> bool {
        self.controller.has_pending_save()
    }

    /// Write the pending save if its debounce window has elapsed.
    pub fn flush_persistence(&mut self) -> Option<PersistedPosition> {
        let viewport = self.controller.take_due_save()?;
        self.write_position(viewport)
    }

    /// Write the pending save now, e.g. when the view is torn down.
    pub fn save_now(&mut self) -> Option<PersistedPosition> {
        let viewport = self.controller.flush_save()?;
        self.write_position(viewport)
    }

    fn write_position(&mut self, viewport: Viewport) -> Option<PersistedPosition> {
        match self.positions.save(viewport.translate_x, viewport.scale) {
            Ok(position) => Some(position),
            Err(err) => {
                log_error!(LogComponent::Application("Timeline"), "Saving position failed: {}", err);
                None
            }
        }
    }

    pub fn clear_saved_position(&self) {
        self.positions.clear();
    }

    pub fn frame(&mut self) -> TimelineFrame {
        let clusters = self.sync_navigable();
        let projection = self.projection();
        let viewport = self.controller.viewport();
        let focused = self.focus.focused_index();

        let points = self
            .navigable
            .iter()
            .enumerate()
            .map(|(index, &p)| {
                let point = &self.visible_points[p];
                let (x, y) = projection.project(point, &viewport);
                RenderedPoint {
                    id: point.id.clone(),
                    dom_id: format!("{}{}", POINT_ID_PREFIX, point.id),
                    x,
                    y,
                    tab_index: self.focus.tab_index(index),
                    focused: focused == Some(index),
                    aria_label: accessible_name(point),
                    aria_description: accessible_description(point, self.config.preview_chars),
                    color_key: point.category.color_key().to_string(),
                }
            })
            .collect();

        let window = projection.visible_window(&viewport, self.width);
        let ticks = axis_ticks(window, viewport.scale)
            .into_iter()
            .map(|t| AxisTick {
                x: viewport.to_screen_x(projection.time.apply(t)),
                label: format_time_label(t, viewport.scale),
            })
            .collect();

        let value = self.animator.state();
        TimelineFrame {
            viewport,
            value_domain: value.domain,
            is_animating: value.is_animating,
            points,
            clusters: clusters.iter().filter(|c| c.is_badge()).map(ClusterBadge::from).collect(),
            ticks,
            focused_id: self.focused_point().map(|p| p.id.clone()),
        }
    }

    fn focused_point(&self) -> Option<&DataPoint> {
        let index = self.focus.focused_index()?;
        self.navigable.get(index).and_then(|&p| self.visible_points.get(p))
    }

    fn navigate(&mut self, direction: FocusDirection) -> KeyOutcome {
        if self.focus.move_focus(direction).is_none() {
            return KeyOutcome::Ignored;
        }
        self.reveal_pending();
        match (self.focus.focused_index(), self.focused_point()) {
            (Some(index), Some(point)) => KeyOutcome::FocusMoved { index, id: point.id.clone() },
            _ => KeyOutcome::Ignored,
        }
    }

    fn view_outcome(&mut self, action: impl FnOnce(&mut Self) -> bool) -> KeyOutcome {
        if action(self) { KeyOutcome::ViewChanged } else { KeyOutcome::Ignored }
    }

    /// Pan the focused point into view if the focus hook fired since the
    /// last reveal.
    fn reveal_pending(&mut self) {
        if self.pending_reveal.take().is_none() {
            return;
        }
        let Some(&p) = self.focus.focused_index().and_then(|index| self.navigable.get(index)) else {
            return;
        };
        let (x, _) = self.projection().project(&self.visible_points[p], &self.controller.viewport());
        if self.controller.pan_into_view(x, self.config.focus_padding_px) {
            self.after_view_change();
        }
    }

    fn after_discrete_zoom(&mut self, changed: bool) -> bool {
        if changed {
            self.after_view_change();
            let percent = (self.controller.viewport().scale * 100.0).round();
            self.announcer.polite(format!("Zoom {}%", percent));
        }
        changed
    }

    fn after_view_change(&mut self) {
        self.refresh_value_target(true);
        self.sync_navigable();
    }

    fn refresh_value_target(&mut self, animate: bool) {
        let kind = self.config.value_scale;
        let window = self.projection().visible_window(&self.controller.viewport(), self.width);
        let target = value_domain_for_window(&self.visible_points, window, kind)
            .or_else(|| {
                value_domain_for_window(
                    &self.visible_points,
                    TimeWindow { start: f64::MIN, end: f64::MAX },
                    kind,
                )
            })
            .unwrap_or_else(|| fallback_domain(kind));
        if animate {
            self.animator.set_target(target);
        } else {
            self.animator.snap_to(target);
        }
    }

    /// Rebuild the navigable list from the current clustering and keep the
    /// focused item focused if it is still individually visible.
    fn sync_navigable(&mut self) -> Rc<Vec<Cluster>> {
        let focused_id = self.focused_point().map(|p| p.id.clone());
        self.rebuild_navigable(focused_id)
    }

    fn rebuild_navigable(&mut self, focused_id: Option<String>) -> Rc<Vec<Cluster>> {
        let viewport = self.controller.viewport();

        let clusters = if should_show_clusters(viewport.scale) {
            let projection = self.projection();
            self.memo.get(
                &self.visible_points,
                viewport,
                projection,
                &self.filters,
                self.config.cluster_threshold_px,
            )
        } else {
            Rc::new(Vec::new())
        };

        self.navigable = {
            let hidden: HashSet<&str> = clusters
                .iter()
                .filter(|c| c.is_badge())
                .flat_map(|c| c.member_ids.iter().map(String::as_str))
                .collect();
            (0..self.visible_points.len())
                .filter(|&p| !hidden.contains(self.visible_points[p].id.as_str()))
                .collect()
        };

        let follow = focused_id.and_then(|id| {
            self.navigable.iter().position(|&p| self.visible_points[p].id == id)
        });
        self.focus.set_items(self.navigable.len(), follow);
        clusters
    }
}

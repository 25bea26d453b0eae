//! Board grid: sticky header, sticky descriptive columns and a slot area
//! scrolled in both directions

use std::time::Duration;

use eframe::egui::{
    pos2, vec2, Align2, CursorIcon, FontId, Painter, Rect, RichText, Sense, Stroke, Ui,
};

use fleetgrid_app::BoardController;
use fleetgrid_domain::model::{CellView, ColumnSpec, GridModel, DESCRIPTIVE_ROW_SPAN};
use fleetgrid_domain::service::snap::clamp_scroll;
use fleetgrid_domain::service::{ColumnResizer, ResizeUpdate, SnapScroller};

use crate::theme::BoardTheme;

const HEADER_HEIGHT: f32 = 30.0;
const ROW_HEIGHT: f32 = 22.0;
const SCROLLBAR_SIZE: f32 = 12.0;
const MIN_THUMB: f32 = 24.0;
const GRIP_WIDTH: f32 = 6.0;
const CELL_FONT: f32 = 11.0;

/// Deferred until the frame stops reading the board state
enum GridAction {
    Click { row: usize, slot: usize },
    Resize(ResizeUpdate),
}

/// Screen regions of one frame
struct Layout {
    header: Rect,
    body: Rect,
    /// Left edge of the slot area
    slots_left: f32,
    view_width: f32,
}

impl Layout {
    fn new(rect: Rect, sticky_width: f32) -> Self {
        let body = Rect::from_min_max(
            pos2(rect.left(), rect.top() + HEADER_HEIGHT),
            pos2(rect.right() - SCROLLBAR_SIZE, rect.bottom() - SCROLLBAR_SIZE),
        );
        let header = Rect::from_min_max(rect.min, pos2(body.right(), body.top()));
        let slots_left = (body.left() + sticky_width).min(body.right());
        Self {
            header,
            body,
            slots_left,
            view_width: body.right() - slots_left,
        }
    }

    fn sticky_clip(&self) -> Rect {
        Rect::from_min_max(self.body.min, pos2(self.slots_left, self.body.bottom()))
    }

    fn slot_clip(&self) -> Rect {
        Rect::from_min_max(pos2(self.slots_left, self.body.top()), self.body.max)
    }

    fn header_slot_clip(&self) -> Rect {
        Rect::from_min_max(pos2(self.slots_left, self.header.top()), self.header.max)
    }
}

pub struct GridPanel {
    scroll_x: f32,
    scroll_y: f32,
    snap: SnapScroller,
    resizer: ColumnResizer,
}

impl GridPanel {
    pub fn new(snap_quiet_secs: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            snap: SnapScroller::new(snap_quiet_secs),
            resizer: ColumnResizer::new(),
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, controller: &mut BoardController, theme: &BoardTheme) {
        let state = controller.state();
        let grid = &state.grid;
        if grid.rows.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(&state.status).color(theme.muted));
            });
            return;
        }

        let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let layout = Layout::new(rect, grid.columns.sticky_width());
        let content_width = grid.columns.slots_width();
        let content_height = grid.rows.len() as f32 * ROW_HEIGHT;
        let before = (self.scroll_x, self.scroll_y);

        if ui.rect_contains_pointer(rect) {
            let delta = ui.input(|i| i.smooth_scroll_delta);
            self.scroll_x -= delta.x;
            self.scroll_y -= delta.y;
        }

        let painter = ui.painter_at(rect);
        self.scroll_x = scrollbar(
            ui,
            &painter,
            Rect::from_min_max(
                pos2(layout.slots_left, layout.body.bottom()),
                pos2(layout.body.right(), rect.bottom()),
            ),
            true,
            self.scroll_x,
            content_width,
            layout.view_width,
            theme,
        );
        self.scroll_y = scrollbar(
            ui,
            &painter,
            Rect::from_min_max(
                pos2(layout.body.right(), layout.body.top()),
                pos2(rect.right(), layout.body.bottom()),
            ),
            false,
            self.scroll_y,
            content_height,
            layout.body.height(),
            theme,
        );
        self.scroll_x = clamp_scroll(self.scroll_x, content_width, layout.view_width);
        self.scroll_y = clamp_scroll(self.scroll_y, content_height, layout.body.height());

        self.snap_horizontal(ui, grid, content_width, layout.view_width);

        let mut actions = Vec::new();
        self.paint_body(ui, &painter, &layout, grid, theme, &mut actions);
        self.paint_sticky(&painter, &layout, grid, theme);
        self.paint_header(ui, &painter, &layout, grid, theme, &mut actions);

        let moved_x = self.scroll_x != before.0;
        let moved_y = self.scroll_y != before.1;
        if moved_x {
            controller.on_horizontal_scroll();
        }
        if moved_y {
            controller.on_vertical_scroll(self.scroll_y);
        }
        for action in actions {
            match action {
                GridAction::Click { row, slot } => {
                    controller.click_cell(row, slot);
                }
                GridAction::Resize(update) => controller.resize_column(&update),
            }
        }
    }

    /// Settle on a slot boundary once horizontal movement is quiet
    fn snap_horizontal(&mut self, ui: &Ui, grid: &GridModel, content: f32, view: f32) {
        let now = ui.input(|i| i.time);
        self.snap.observe(self.scroll_x, now);
        if let Some(target) = self.snap.poll(now, grid.columns.first_slot_width()) {
            self.scroll_x = clamp_scroll(target, content, view);
            self.snap.settle(self.scroll_x);
        }
        if let Some(wait) = self.snap.remaining(now) {
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f64(wait.max(0.0)));
        }
    }

    fn visible_rows(&self, layout: &Layout, total: usize) -> std::ops::Range<usize> {
        let first = (self.scroll_y / ROW_HEIGHT).floor().max(0.0) as usize;
        let count = (layout.body.height() / ROW_HEIGHT).ceil() as usize + 1;
        first.min(total)..(first + count).min(total)
    }

    fn row_top(&self, layout: &Layout, row: usize) -> f32 {
        layout.body.top() + row as f32 * ROW_HEIGHT - self.scroll_y
    }

    fn paint_body(
        &self,
        ui: &Ui,
        painter: &Painter,
        layout: &Layout,
        grid: &GridModel,
        theme: &BoardTheme,
        actions: &mut Vec<GridAction>,
    ) {
        let clip = layout.slot_clip();
        let slot_painter = painter.with_clip_rect(clip);
        let slot_columns = grid.columns.slot_columns();
        let slot_offsets = grid.columns.slot_offsets();
        let grid_line = Stroke::new(0.5, theme.border.gamma_multiply(0.15));
        let vehicle_line = Stroke::new(1.0, theme.border.gamma_multiply(0.4));

        for row_index in self.visible_rows(layout, grid.rows.len()) {
            let row = &grid.rows[row_index];
            let top = self.row_top(layout, row_index);
            if row.alternate {
                slot_painter.rect_filled(
                    Rect::from_min_max(pos2(clip.left(), top), pos2(clip.right(), top + ROW_HEIGHT)),
                    0.0,
                    theme.band_bg,
                );
            }

            for (slot_index, (column, offset)) in slot_columns.iter().zip(&slot_offsets).enumerate() {
                let left = layout.slots_left + offset - self.scroll_x;
                if left + column.width < clip.left() || left > clip.right() {
                    continue;
                }
                let cell = Rect::from_min_size(pos2(left, top), vec2(column.width, ROW_HEIGHT));
                let Some(view) = row.cells.get(slot_index) else {
                    continue;
                };

                match view {
                    CellView::Flag { filled, .. } => {
                        if *filled {
                            slot_painter.rect_filled(cell.shrink(1.5), 2.0, theme.layer_fill(row.layer));
                        }
                    }
                    CellView::Plan { tag: Some(tag), .. } => {
                        slot_painter.rect_filled(cell.shrink(1.0), 2.0, theme.plan_tint());
                        slot_painter.with_clip_rect(cell.intersect(clip)).text(
                            cell.left_center() + vec2(3.0, 0.0),
                            Align2::LEFT_CENTER,
                            tag,
                            FontId::proportional(CELL_FONT),
                            theme.text,
                        );
                    }
                    CellView::Plan { tag: None, .. } => {}
                }
                slot_painter.vline(cell.right(), cell.y_range(), grid_line);

                let hit = cell.intersect(clip);
                if !hit.is_positive() {
                    continue;
                }
                let id = ui.id().with(("cell", row_index, slot_index));
                match view {
                    CellView::Flag { .. } => {
                        let response = ui
                            .interact(hit, id, Sense::click())
                            .on_hover_cursor(CursorIcon::PointingHand);
                        if response.clicked() {
                            actions.push(GridAction::Click {
                                row: row_index,
                                slot: slot_index,
                            });
                        }
                    }
                    CellView::Plan {
                        details: Some(details),
                        ..
                    } => {
                        ui.interact(hit, id, Sense::hover()).on_hover_text(details);
                    }
                    CellView::Plan { .. } => {}
                }
            }

            let bottom = top + ROW_HEIGHT;
            let last_of_vehicle = (row_index + 1) % DESCRIPTIVE_ROW_SPAN == 0;
            slot_painter.hline(
                clip.x_range(),
                bottom,
                if last_of_vehicle { vehicle_line } else { grid_line },
            );
        }
    }

    fn paint_sticky(&self, painter: &Painter, layout: &Layout, grid: &GridModel, theme: &BoardTheme) {
        let clip = layout.sticky_clip();
        let sticky_painter = painter.with_clip_rect(clip);
        let columns = grid.columns.sticky_columns();
        let offsets = grid.columns.sticky_offsets();
        let Some((label_column, descriptive_columns)) = columns.split_last() else {
            return;
        };
        let label_left = clip.left() + offsets[columns.len() - 1];
        let border = Stroke::new(1.0, theme.border.gamma_multiply(0.4));
        let faint = Stroke::new(0.5, theme.border.gamma_multiply(0.15));
        let font = FontId::proportional(12.0);

        let rows = self.visible_rows(layout, grid.rows.len());
        for row_index in rows.clone() {
            let row = &grid.rows[row_index];
            let top = self.row_top(layout, row_index);
            let bg = if row.alternate { theme.band_bg } else { theme.sticky_bg };

            // Layer label column
            let cell = Rect::from_min_size(pos2(label_left, top), vec2(label_column.width, ROW_HEIGHT));
            sticky_painter.rect_filled(cell, 0.0, bg);
            sticky_painter.text(
                cell.left_center() + vec2(4.0, 0.0),
                Align2::LEFT_CENTER,
                row.layer_label(),
                FontId::proportional(CELL_FONT),
                theme.muted,
            );
            sticky_painter.hline(cell.x_range(), cell.bottom(), faint);

            // Descriptive block once per vehicle, also when its first row is scrolled away
            let first_of_vehicle = row_index - row_index % DESCRIPTIVE_ROW_SPAN;
            if row_index != first_of_vehicle && row_index != rows.start {
                continue;
            }
            let Some(descriptive) = grid.rows[first_of_vehicle].descriptive.as_ref() else {
                continue;
            };
            let block_top = self.row_top(layout, first_of_vehicle);
            let block_height = DESCRIPTIVE_ROW_SPAN as f32 * ROW_HEIGHT;
            for ((column, offset), text) in descriptive_columns
                .iter()
                .zip(&offsets)
                .zip(descriptive.texts())
            {
                let block = Rect::from_min_size(
                    pos2(clip.left() + offset, block_top),
                    vec2(column.width, block_height),
                );
                sticky_painter.rect_filled(block, 0.0, bg);
                sticky_painter.with_clip_rect(block.intersect(clip).shrink2(vec2(4.0, 0.0))).text(
                    block.left_center() + vec2(4.0, 0.0),
                    Align2::LEFT_CENTER,
                    text,
                    font.clone(),
                    theme.text,
                );
                sticky_painter.vline(block.right(), block.y_range(), faint);
            }
            sticky_painter.hline(
                clip.left()..=label_left + label_column.width,
                block_top + block_height,
                border,
            );
        }

        painter.vline(layout.slots_left, layout.body.y_range(), border);
    }

    fn paint_header(
        &mut self,
        ui: &Ui,
        painter: &Painter,
        layout: &Layout,
        grid: &GridModel,
        theme: &BoardTheme,
        actions: &mut Vec<GridAction>,
    ) {
        let header = layout.header;
        painter.rect_filled(header, 0.0, theme.header_bg);
        painter.hline(header.x_range(), header.bottom(), Stroke::new(1.0, theme.border.gamma_multiply(0.4)));
        let font = FontId::proportional(12.0);
        let divider = Stroke::new(0.5, theme.border.gamma_multiply(0.25));

        let slot_clip = layout.header_slot_clip();
        let slot_painter = painter.with_clip_rect(slot_clip);
        for (column, offset) in grid.columns.slot_columns().iter().zip(grid.columns.slot_offsets()) {
            let left = layout.slots_left + offset - self.scroll_x;
            if left + column.width < slot_clip.left() || left > slot_clip.right() {
                continue;
            }
            let cell = Rect::from_min_size(pos2(left, header.top()), vec2(column.width, HEADER_HEIGHT));
            slot_painter.text(cell.center(), Align2::CENTER_CENTER, &column.title, font.clone(), theme.text);
            slot_painter.vline(cell.right(), cell.y_range(), divider);
            if cell.right() > slot_clip.left() && cell.right() <= slot_clip.right() {
                self.resize_grip(ui, painter, column, cell.right(), header, theme, actions);
            }
        }

        let sticky_clip = Rect::from_min_max(header.min, pos2(layout.slots_left, header.bottom()));
        let sticky_painter = painter.with_clip_rect(sticky_clip);
        sticky_painter.rect_filled(sticky_clip, 0.0, theme.header_bg);
        let sticky_offsets = grid.columns.sticky_offsets();
        for (column, offset) in grid.columns.sticky_columns().iter().zip(sticky_offsets) {
            let cell = Rect::from_min_size(
                pos2(header.left() + offset, header.top()),
                vec2(column.width, HEADER_HEIGHT),
            );
            sticky_painter.with_clip_rect(cell.intersect(sticky_clip)).text(
                cell.left_center() + vec2(4.0, 0.0),
                Align2::LEFT_CENTER,
                &column.title,
                font.clone(),
                theme.text,
            );
            sticky_painter.vline(cell.right(), cell.y_range(), divider);
            if cell.right() <= sticky_clip.right() {
                self.resize_grip(ui, painter, column, cell.right(), header, theme, actions);
            }
        }
    }

    /// Drag handle on the right edge of a header cell
    #[allow(clippy::too_many_arguments)]
    fn resize_grip(
        &mut self,
        ui: &Ui,
        painter: &Painter,
        column: &ColumnSpec,
        edge: f32,
        header: Rect,
        theme: &BoardTheme,
        actions: &mut Vec<GridAction>,
    ) {
        let grip = Rect::from_center_size(pos2(edge, header.center().y), vec2(GRIP_WIDTH, HEADER_HEIGHT));
        let response = ui
            .interact(grip, ui.id().with(("grip", &column.key)), Sense::drag())
            .on_hover_cursor(CursorIcon::ResizeHorizontal);

        if response.drag_started() {
            if let Some(pointer) = response.interact_pointer_pos() {
                self.resizer.begin(&column.key, column.width, pointer.x);
            }
        }
        if response.dragged() && self.resizer.active_key() == Some(column.key.as_str()) {
            if let Some(update) = response
                .interact_pointer_pos()
                .and_then(|pointer| self.resizer.drag_to(pointer.x))
            {
                actions.push(GridAction::Resize(update));
            }
        }
        if response.drag_stopped() {
            self.resizer.end();
        }
        if response.hovered() || response.dragged() {
            painter.vline(edge, header.y_range(), Stroke::new(2.0, theme.accent));
        }
    }
}

/// Draggable scrollbar along `track`; returns the new offset
#[allow(clippy::too_many_arguments)]
fn scrollbar(
    ui: &Ui,
    painter: &Painter,
    track: Rect,
    horizontal: bool,
    offset: f32,
    content: f32,
    view: f32,
    theme: &BoardTheme,
) -> f32 {
    painter.rect_filled(track, 0.0, theme.header_bg);
    if view <= 0.0 || content <= view {
        return offset;
    }

    let track_len = if horizontal { track.width() } else { track.height() };
    let thumb_len = (track_len * view / content).clamp(MIN_THUMB.min(track_len), track_len);
    let max_offset = content - view;
    let travel = (track_len - thumb_len).max(1.0);
    let start = travel * (offset / max_offset).clamp(0.0, 1.0);
    let thumb = if horizontal {
        Rect::from_min_size(pos2(track.left() + start, track.top() + 2.0), vec2(thumb_len, track.height() - 4.0))
    } else {
        Rect::from_min_size(pos2(track.left() + 2.0, track.top() + start), vec2(track.width() - 4.0, thumb_len))
    };

    let id = ui.id().with(("scrollbar", horizontal));
    let response = ui.interact(thumb, id, Sense::drag());
    let color = if response.hovered() || response.dragged() {
        theme.accent
    } else {
        theme.muted.gamma_multiply(0.6)
    };
    painter.rect_filled(thumb, 4.0, color);

    if response.dragged() {
        let delta = response.drag_delta();
        let moved = if horizontal { delta.x } else { delta.y };
        return offset + moved * max_offset / travel;
    }
    offset
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::color::Color;
    use crate::error::InputError;
    use crate::event::{EventOutcome, KeyInput, TouchSample, WidgetEvent, unhandled};
    use crate::geometry::{Point, Rect, Size};
    use crate::input::TOUCH_QUEUE_LEN;
    use crate::tree::Ui;
    use crate::widget::{TypeFlags, WidgetFlags, WidgetId, WidgetType};

    static PANEL: WidgetType = WidgetType {
        name: "panel",
        flags: TypeFlags::ALLOW_CHILDREN,
        callback: unhandled,
        colors: &[Color::WHITE, Color::BLACK],
    };

    static LABEL: WidgetType = WidgetType {
        name: "label",
        flags: TypeFlags::empty(),
        callback: unhandled,
        colors: &[Color::BLACK],
    };

    /// Shared event log: (application id, event).
    type Log = Rc<RefCell<Vec<(u32, WidgetEvent)>>>;

    fn recorder(log: &Log) -> crate::event::WidgetCallback {
        let log = log.clone();
        Rc::new(move |ui: &mut Ui, id: WidgetId, event: &WidgetEvent| {
            log.borrow_mut().push((ui.id_of(id), event.clone()));
            EventOutcome::Handled
        })
    }

    fn events_for(log: &Log, id: u32) -> Vec<WidgetEvent> {
        log.borrow()
            .iter()
            .filter(|(i, _)| *i == id)
            .map(|(_, e)| e.clone())
            .collect()
    }

    fn ui() -> Ui {
        let _ = env_logger::builder().is_test(true).try_init();
        Ui::new(Size::new(480, 272))
    }

    fn panel(ui: &mut Ui, id: u32, r: (f32, f32, f32, f32), parent: Option<WidgetId>) -> WidgetId {
        ui.create(
            &PANEL,
            id,
            r.0,
            r.1,
            r.2,
            r.3,
            parent,
            None,
            WidgetFlags::empty(),
        )
        .unwrap()
    }

    // ------------------------------------------------------------------
    // Geometry resolution
    // ------------------------------------------------------------------

    #[test]
    fn percent_geometry_tracks_parent_resize() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 100.0, 100.0), None);
        let b = panel(&mut ui, 2, (0.0, 0.0, 0.0, 0.0), Some(a));
        ui.set_position_percent(b, 10.0, 10.0);
        ui.set_size_percent(b, 50.0, 50.0);
        assert_eq!(ui.resolved_rect(b), Rect::new(10, 10, 50, 50));

        // No propagation step: the next read sees the new parent box.
        ui.set_size(a, 200.0, 200.0);
        assert_eq!(ui.resolved_rect(b), Rect::new(20, 20, 100, 100));
    }

    #[test]
    fn percent_resolution_rounds_to_nearest() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 33.0, 33.0), None);
        let b = panel(&mut ui, 2, (0.0, 0.0, 0.0, 0.0), Some(a));
        ui.set_size_percent(b, 50.0, 50.0);
        // 50% of 33 = 16.5, rounds away from zero.
        assert_eq!(ui.resolved_width(b), 17);
    }

    #[test]
    fn percent_resolves_against_parent_inner_box() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 100.0, 100.0), None);
        ui.set_padding_left_right(a, 10);
        let b = panel(&mut ui, 2, (0.0, 0.0, 0.0, 50.0), Some(a));
        ui.set_x_position_percent(b, 0.0);
        ui.set_width_percent(b, 50.0);
        assert_eq!(ui.inner_width(a), 80);
        assert_eq!(ui.resolved_width(b), 40);
        // Children originate at the parent's inner origin.
        assert_eq!(ui.resolved_x(b), 10);
    }

    #[test]
    fn expanded_fills_parent_inner_box() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (10.0, 10.0, 100.0, 100.0), None);
        ui.set_padding(a, 4);
        let b = panel(&mut ui, 2, (5.0, 5.0, 20.0, 20.0), Some(a));
        ui.set_expanded(b, true);
        assert_eq!(ui.resolved_rect(b), Rect::new(14, 14, 92, 92));

        ui.set_expanded(b, false);
        assert_eq!(ui.resolved_rect(b), Rect::new(19, 19, 20, 20));
    }

    #[test]
    fn scroll_offsets_children() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 100.0, 100.0), None);
        let b = panel(&mut ui, 2, (10.0, 10.0, 20.0, 20.0), Some(a));
        ui.set_scroll_y(a, 30);
        assert_eq!(ui.resolved_y(b), -20);
        ui.inc_scroll_y(a, -30);
        assert_eq!(ui.resolved_y(b), 10);
        assert_eq!(ui.scroll_y(a), 0);
    }

    // ------------------------------------------------------------------
    // Creation and removal
    // ------------------------------------------------------------------

    #[test]
    fn create_fails_when_parent_forbids_children() {
        let mut ui = ui();
        let leaf = ui
            .create(
                &LABEL,
                1,
                0.0,
                0.0,
                50.0,
                20.0,
                None,
                None,
                WidgetFlags::empty(),
            )
            .unwrap();
        assert!(
            ui.create(
                &LABEL,
                2,
                0.0,
                0.0,
                10.0,
                10.0,
                Some(leaf),
                None,
                WidgetFlags::empty()
            )
            .is_none()
        );
    }

    #[test]
    fn create_fails_for_stale_parent() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        ui.remove(a);
        assert!(
            ui.create(
                &LABEL,
                2,
                0.0,
                0.0,
                10.0,
                10.0,
                Some(a),
                None,
                WidgetFlags::empty()
            )
            .is_none()
        );
    }

    #[test]
    fn create_delivers_init() {
        let mut ui = ui();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        ui.create(
            &PANEL,
            7,
            0.0,
            0.0,
            50.0,
            50.0,
            None,
            Some(recorder(&log)),
            WidgetFlags::empty(),
        )
        .unwrap();
        assert_eq!(events_for(&log, 7).first(), Some(&WidgetEvent::Init));
    }

    #[test]
    fn remove_takes_subtree_and_clears_references() {
        let mut ui = ui();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let p = ui
            .create(
                &PANEL,
                1,
                0.0,
                0.0,
                100.0,
                100.0,
                None,
                Some(recorder(&log)),
                WidgetFlags::empty(),
            )
            .unwrap();
        let c = ui
            .create(
                &PANEL,
                2,
                0.0,
                0.0,
                100.0,
                100.0,
                Some(p),
                Some(recorder(&log)),
                WidgetFlags::empty(),
            )
            .unwrap();

        ui.set_focus(c);
        ui.inject_touch(TouchSample::pressed(10, 10)).unwrap();
        ui.process();
        assert_eq!(ui.active_widget(), Some(c));

        assert!(ui.remove(p));
        assert_eq!(ui.focused_widget(), None);
        assert_eq!(ui.active_widget(), None);
        assert_eq!(ui.id_of(p), 0);
        assert_eq!(ui.id_of(c), 0);

        // Children observe Remove before their parent.
        let removes: Vec<u32> = log
            .borrow()
            .iter()
            .filter(|(_, e)| *e == WidgetEvent::Remove)
            .map(|(i, _)| *i)
            .collect();
        assert_eq!(removes, vec![2, 1]);
    }

    #[test]
    fn remove_refuses_root() {
        let mut ui = ui();
        let root = ui.root();
        assert!(!ui.remove(root));
        assert!(ui.find_by_id(0).is_none());
        assert_eq!(ui.resolved_rect(root), Rect::new(0, 0, 480, 272));
    }

    #[test]
    fn remove_inside_callback_is_deferred_to_safe_point() {
        let mut ui = ui();
        let alive_during_callback = Rc::new(RefCell::new(false));
        let seen = alive_during_callback.clone();
        let cb = Rc::new(move |ui: &mut Ui, id: WidgetId, event: &WidgetEvent| {
            if let WidgetEvent::Click { .. } = event {
                ui.remove(id);
                // Still resolvable: the free must wait for the safe point.
                *seen.borrow_mut() = ui.id_of(id) == 9;
            }
            EventOutcome::Handled
        });
        let w = ui
            .create(&PANEL, 9, 0.0, 0.0, 50.0, 50.0, None, Some(cb), WidgetFlags::empty())
            .unwrap();

        ui.inject_touch(TouchSample::pressed(10, 10)).unwrap();
        ui.inject_touch(TouchSample::released(10, 10)).unwrap();
        ui.process();

        assert!(*alive_during_callback.borrow());
        assert_eq!(ui.id_of(w), 0);
    }

    // ------------------------------------------------------------------
    // Hit-testing, capture, focus
    // ------------------------------------------------------------------

    #[test]
    fn hit_test_selects_deepest_highest_z() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 200.0, 200.0), None);
        let b = panel(&mut ui, 2, (10.0, 10.0, 100.0, 100.0), Some(a));
        let d = panel(&mut ui, 3, (20.0, 20.0, 40.0, 40.0), Some(b));
        assert_eq!(ui.hit_test(Point::new(35, 35)), Some(d));

        // A higher-z sibling of b wins over b's subtree.
        let e = panel(&mut ui, 4, (0.0, 0.0, 200.0, 200.0), Some(a));
        ui.set_z_index(e, 1);
        assert_eq!(ui.hit_test(Point::new(35, 35)), Some(e));

        // Outside everything but the root.
        assert_eq!(ui.hit_test(Point::new(470, 260)), Some(ui.root()));
    }

    #[test]
    fn equal_z_later_sibling_is_frontmost() {
        let mut ui = ui();
        let first = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        let second = panel(&mut ui, 2, (0.0, 0.0, 50.0, 50.0), None);
        assert_eq!(ui.hit_test(Point::new(25, 25)), Some(second));

        ui.put_on_front(first, false);
        assert_eq!(ui.hit_test(Point::new(25, 25)), Some(first));
    }

    #[test]
    fn hidden_widgets_are_not_hit() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        ui.hide(a);
        assert_eq!(ui.hit_test(Point::new(25, 25)), Some(ui.root()));
    }

    #[test]
    fn capture_routes_gesture_to_press_target() {
        let mut ui = ui();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let x = ui
            .create(
                &PANEL,
                5,
                0.0,
                0.0,
                50.0,
                50.0,
                None,
                Some(recorder(&log)),
                WidgetFlags::empty(),
            )
            .unwrap();

        ui.inject_touch(TouchSample::pressed(10, 10)).unwrap();
        // Finger leaves the widget; events keep flowing to the capture.
        ui.inject_touch(TouchSample::pressed(400, 200)).unwrap();
        ui.inject_touch(TouchSample::released(400, 200)).unwrap();
        ui.process();

        assert_eq!(
            events_for(&log, 5),
            vec![
                WidgetEvent::Init,
                WidgetEvent::ActiveIn,
                WidgetEvent::TouchStart { at: Point::new(10, 10) },
                WidgetEvent::TouchMove { at: Point::new(400, 200) },
                WidgetEvent::TouchEnd { at: Point::new(400, 200) },
                WidgetEvent::ActiveOut,
                WidgetEvent::Draw { clip: Rect::new(0, 0, 50, 50) },
            ]
        );
        assert_eq!(ui.active_widget(), None);
        let _ = x;
    }

    #[test]
    fn click_fires_only_for_release_inside() {
        let mut ui = ui();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        ui.create(
            &PANEL,
            5,
            0.0,
            0.0,
            50.0,
            50.0,
            None,
            Some(recorder(&log)),
            WidgetFlags::empty(),
        )
        .unwrap();

        ui.inject_touch(TouchSample::pressed(10, 10)).unwrap();
        ui.inject_touch(TouchSample::released(20, 20)).unwrap();
        ui.process();
        assert!(
            events_for(&log, 5).contains(&WidgetEvent::Click { at: Point::new(20, 20) })
        );

        log.borrow_mut().clear();
        ui.inject_touch(TouchSample::pressed(10, 10)).unwrap();
        ui.inject_touch(TouchSample::released(400, 200)).unwrap();
        ui.process();
        assert!(
            !events_for(&log, 5)
                .iter()
                .any(|e| matches!(e, WidgetEvent::Click { .. }))
        );
    }

    #[test]
    fn keys_reach_only_the_focused_widget() {
        let mut ui = ui();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let x = ui
            .create(
                &PANEL,
                1,
                0.0,
                0.0,
                50.0,
                50.0,
                None,
                Some(recorder(&log)),
                WidgetFlags::empty(),
            )
            .unwrap();
        let y = ui
            .create(
                &PANEL,
                2,
                60.0,
                0.0,
                50.0,
                50.0,
                None,
                Some(recorder(&log)),
                WidgetFlags::empty(),
            )
            .unwrap();

        ui.set_focus(x);
        ui.inject_key(KeyInput::new('a')).unwrap();
        ui.process();

        ui.set_focus(y);
        ui.inject_key(KeyInput::new('b')).unwrap();
        ui.process();

        let x_keys: Vec<char> = events_for(&log, 1)
            .iter()
            .filter_map(|e| match e {
                WidgetEvent::KeyPress { key } => Some(key.ch),
                _ => None,
            })
            .collect();
        let y_keys: Vec<char> = events_for(&log, 2)
            .iter()
            .filter_map(|e| match e {
                WidgetEvent::KeyPress { key } => Some(key.ch),
                _ => None,
            })
            .collect();
        assert_eq!(x_keys, vec!['a']);
        assert_eq!(y_keys, vec!['b']);

        // The focus handover was observable on both sides.
        assert!(events_for(&log, 1).contains(&WidgetEvent::FocusOut));
        assert!(events_for(&log, 2).contains(&WidgetEvent::FocusIn));
    }

    #[test]
    fn keys_without_focus_are_dropped() {
        let mut ui = ui();
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        ui.create(
            &PANEL,
            1,
            0.0,
            0.0,
            50.0,
            50.0,
            None,
            Some(recorder(&log)),
            WidgetFlags::empty(),
        )
        .unwrap();

        ui.inject_key(KeyInput::new('z')).unwrap();
        ui.process();
        assert!(
            !events_for(&log, 1)
                .iter()
                .any(|e| matches!(e, WidgetEvent::KeyPress { .. }))
        );
    }

    #[test]
    fn touch_does_not_move_focus() {
        let mut ui = ui();
        let x = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        let y = panel(&mut ui, 2, (60.0, 0.0, 50.0, 50.0), None);
        ui.set_focus(x);

        ui.inject_touch(TouchSample::pressed(70, 10)).unwrap();
        ui.inject_touch(TouchSample::released(70, 10)).unwrap();
        ui.process();

        assert_eq!(ui.focused_widget(), Some(x));
        let _ = y;
    }

    // ------------------------------------------------------------------
    // Invalidation and clipping
    // ------------------------------------------------------------------

    #[test]
    fn invalidate_with_parent_marks_one_level() {
        let mut ui = ui();
        let parent_log: Log = Rc::new(RefCell::new(Vec::new()));
        let child_log: Log = Rc::new(RefCell::new(Vec::new()));
        let p = ui
            .create(
                &PANEL,
                1,
                0.0,
                0.0,
                100.0,
                100.0,
                None,
                Some(recorder(&parent_log)),
                WidgetFlags::empty(),
            )
            .unwrap();
        let c = ui
            .create(
                &PANEL,
                2,
                10.0,
                10.0,
                50.0,
                50.0,
                Some(p),
                Some(recorder(&child_log)),
                WidgetFlags::INVALIDATE_WITH_PARENT,
            )
            .unwrap();
        ui.process();
        parent_log.borrow_mut().clear();
        child_log.borrow_mut().clear();

        ui.invalidate(c);
        ui.process();
        assert!(
            events_for(&parent_log, 1)
                .iter()
                .any(|e| matches!(e, WidgetEvent::Draw { .. }))
        );

        // Without the flag the parent stays clean.
        ui.set_invalidate_with_parent(c, false);
        parent_log.borrow_mut().clear();
        child_log.borrow_mut().clear();
        ui.invalidate(c);
        ui.process();
        assert!(parent_log.borrow().is_empty());
        assert!(
            events_for(&child_log, 2)
                .iter()
                .any(|e| matches!(e, WidgetEvent::Draw { .. }))
        );
    }

    #[test]
    fn opaque_higher_sibling_occludes_redraw() {
        let mut ui = ui();
        let c1_log: Log = Rc::new(RefCell::new(Vec::new()));
        let c2_log: Log = Rc::new(RefCell::new(Vec::new()));
        let c1 = ui
            .create(
                &PANEL,
                1,
                0.0,
                0.0,
                50.0,
                50.0,
                None,
                Some(recorder(&c1_log)),
                WidgetFlags::empty(),
            )
            .unwrap();
        let c2 = ui
            .create(
                &PANEL,
                2,
                0.0,
                0.0,
                50.0,
                50.0,
                None,
                Some(recorder(&c2_log)),
                WidgetFlags::empty(),
            )
            .unwrap();
        ui.set_z_index(c2, 1);
        ui.process();

        assert!(
            !events_for(&c1_log, 1)
                .iter()
                .any(|e| matches!(e, WidgetEvent::Draw { .. }))
        );
        assert!(
            events_for(&c2_log, 2)
                .contains(&WidgetEvent::Draw { clip: Rect::new(0, 0, 50, 50) })
        );
        assert!(ui.visible_region(c1).is_empty());
        let _ = c1;
    }

    #[test]
    fn partial_occlusion_clips_to_the_uncovered_part() {
        let mut ui = ui();
        let c1 = panel(&mut ui, 1, (0.0, 0.0, 100.0, 100.0), None);
        let c2 = panel(&mut ui, 2, (50.0, 0.0, 50.0, 100.0), None);
        ui.set_z_index(c2, 1);
        assert_eq!(
            ui.visible_region(c1).rects(),
            &[Rect::new(0, 0, 50, 100)]
        );
    }

    #[test]
    fn translucent_or_hidden_siblings_do_not_occlude() {
        let mut ui = ui();
        let c1 = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        let c2 = panel(&mut ui, 2, (0.0, 0.0, 50.0, 50.0), None);
        ui.set_z_index(c2, 1);

        ui.set_alpha(c2, 128);
        assert_eq!(ui.visible_region(c1).rects(), &[Rect::new(0, 0, 50, 50)]);

        ui.set_alpha(c2, 255);
        ui.hide(c2);
        assert_eq!(ui.visible_region(c1).rects(), &[Rect::new(0, 0, 50, 50)]);
    }

    #[test]
    fn clip_is_bounded_by_ancestors() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 100.0, 100.0), None);
        // Child sticks out of the parent on the right.
        let b = panel(&mut ui, 2, (80.0, 10.0, 50.0, 20.0), Some(a));
        assert_eq!(ui.visible_region(b).rects(), &[Rect::new(80, 10, 20, 20)]);
    }

    #[test]
    fn redraw_pass_clears_dirty_state() {
        let mut ui = ui();
        panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        assert!(ui.process() > 0);
        assert_eq!(ui.process(), 0);
    }

    #[test]
    fn hiding_repaints_the_parent() {
        let mut ui = ui();
        let parent_log: Log = Rc::new(RefCell::new(Vec::new()));
        let p = ui
            .create(
                &PANEL,
                1,
                0.0,
                0.0,
                100.0,
                100.0,
                None,
                Some(recorder(&parent_log)),
                WidgetFlags::empty(),
            )
            .unwrap();
        let c = panel(&mut ui, 2, (10.0, 10.0, 50.0, 50.0), Some(p));
        ui.set_focus(c);
        ui.process();
        parent_log.borrow_mut().clear();

        ui.hide(c);
        assert_eq!(ui.focused_widget(), None);
        ui.process();
        assert!(
            events_for(&parent_log, 1)
                .iter()
                .any(|e| matches!(e, WidgetEvent::Draw { .. }))
        );
    }

    // ------------------------------------------------------------------
    // Error model
    // ------------------------------------------------------------------

    #[test]
    fn stale_handles_yield_neutral_defaults() {
        let mut ui = ui();
        let w = panel(&mut ui, 1, (5.0, 5.0, 50.0, 50.0), None);
        ui.set_text(w, "hello");
        ui.remove(w);

        assert_eq!(ui.resolved_rect(w), Rect::ZERO);
        assert_eq!(ui.alpha(w), 0);
        assert_eq!(ui.z_index(w), 0);
        assert!(!ui.is_visible(w));
        assert!(!ui.is_focused(w));
        assert_eq!(ui.text(w), None);
        assert_eq!(ui.parent_of(w), None);
        assert!(!ui.set_position(w, 1.0, 1.0));
        assert!(!ui.invalidate(w));
        assert!(!ui.set_focus(w));
        assert_eq!(
            ui.dispatch(w, &WidgetEvent::FocusIn),
            EventOutcome::Ignored
        );
    }

    #[test]
    fn saturated_queue_rejects_and_drops() {
        let mut ui = ui();
        for _ in 0..TOUCH_QUEUE_LEN {
            ui.inject_touch(TouchSample::pressed(1, 1)).unwrap();
        }
        assert_eq!(
            ui.inject_touch(TouchSample::pressed(2, 2)),
            Err(InputError::QueueFull)
        );
        // The queue drains fully on the next tick.
        assert!(ui.process() >= TOUCH_QUEUE_LEN as u32);
        assert!(ui.inject_touch(TouchSample::released(1, 1)).is_ok());
    }

    // ------------------------------------------------------------------
    // Tree queries and ordering
    // ------------------------------------------------------------------

    #[test]
    fn is_child_of_walks_the_parent_chain() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 100.0, 100.0), None);
        let b = panel(&mut ui, 2, (0.0, 0.0, 80.0, 80.0), Some(a));
        let c = panel(&mut ui, 3, (0.0, 0.0, 60.0, 60.0), Some(b));
        assert!(ui.is_child_of(c, a));
        assert!(ui.is_child_of(c, b));
        assert!(!ui.is_child_of(a, c));
        assert!(!ui.is_child_of(a, a));
    }

    #[test]
    fn find_by_id_shallow_and_deep() {
        let mut ui = ui();
        let a = panel(&mut ui, 10, (0.0, 0.0, 100.0, 100.0), None);
        let b = panel(&mut ui, 20, (0.0, 0.0, 80.0, 80.0), Some(a));
        let c = panel(&mut ui, 30, (0.0, 0.0, 60.0, 60.0), Some(b));

        assert_eq!(ui.find_by_id(30), Some(c));
        assert_eq!(ui.find_by_id_in(20, Some(a), false), Some(b));
        assert_eq!(ui.find_by_id_in(30, Some(a), false), None);
        assert_eq!(ui.find_by_id_in(30, Some(a), true), Some(c));
        assert_eq!(ui.find_by_id(99), None);
    }

    #[test]
    fn put_on_front_can_take_focus() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        let b = panel(&mut ui, 2, (0.0, 0.0, 50.0, 50.0), None);
        assert_eq!(ui.hit_test(Point::new(25, 25)), Some(b));

        assert!(ui.put_on_front(a, true));
        assert_eq!(ui.hit_test(Point::new(25, 25)), Some(a));
        assert_eq!(ui.focused_widget(), Some(a));
    }

    #[test]
    fn z_index_orders_siblings_above_insertion_order() {
        let mut ui = ui();
        let a = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        let b = panel(&mut ui, 2, (0.0, 0.0, 50.0, 50.0), None);
        ui.set_z_index(a, 5);
        assert_eq!(ui.hit_test(Point::new(25, 25)), Some(a));
        assert_eq!(ui.z_index(a), 5);
        let _ = b;
    }

    // ------------------------------------------------------------------
    // Callback specialization
    // ------------------------------------------------------------------

    #[test]
    fn shim_handles_its_events_and_forwards_the_rest() {
        let mut ui = ui();
        let clicks = Rc::new(RefCell::new(0u32));
        let seen = clicks.clone();
        let shim = Rc::new(move |ui: &mut Ui, id: WidgetId, event: &WidgetEvent| {
            match event {
                WidgetEvent::Click { .. } => {
                    *seen.borrow_mut() += 1;
                    EventOutcome::Handled
                }
                _ => unhandled(ui, id, event),
            }
        });
        let w = ui
            .create(&PANEL, 1, 0.0, 0.0, 50.0, 50.0, None, Some(shim), WidgetFlags::empty())
            .unwrap();

        assert_eq!(
            ui.dispatch(w, &WidgetEvent::Click { at: Point::new(1, 1) }),
            EventOutcome::Handled
        );
        assert_eq!(ui.dispatch(w, &WidgetEvent::FocusIn), EventOutcome::Ignored);
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn ignore_invalidate_suppresses_dirty_marking() {
        let mut ui = ui();
        let w = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        ui.process();

        ui.set_ignore_invalidate(w, true, false);
        assert!(!ui.invalidate(w));
        assert_eq!(ui.process(), 0);

        // Re-enabling with invalidate_now makes the batch visible.
        ui.set_ignore_invalidate(w, false, true);
        assert!(ui.process() > 0);
    }

    #[test]
    fn text_drawing_precondition_needs_font_and_text() {
        static MONO: crate::font::Font = crate::font::Font::new("mono-8", 10);
        let mut ui = ui();
        let w = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        assert!(!ui.has_font_and_text(w));

        ui.set_text(w, "42");
        assert!(!ui.has_font_and_text(w));
        ui.set_font(w, &MONO);
        assert!(ui.has_font_and_text(w));
        assert_eq!(ui.font(w).map(|f| f.name), Some("mono-8"));

        ui.clear_text(w);
        assert!(!ui.has_font_and_text(w));
    }

    #[test]
    fn instance_palette_overrides_descriptor_palette() {
        let mut ui = ui();
        let w = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        assert_eq!(ui.color(w, 0), Color::WHITE);
        assert_eq!(ui.color(w, 1), Color::BLACK);

        ui.set_color(w, 0, Color::from_rgb(200, 0, 0));
        assert_eq!(ui.color(w, 0), Color::from_rgb(200, 0, 0));
        // Untouched slots keep the descriptor default.
        assert_eq!(ui.color(w, 1), Color::BLACK);
    }

    #[test]
    fn user_data_round_trips_through_any() {
        let mut ui = ui();
        let w = panel(&mut ui, 1, (0.0, 0.0, 50.0, 50.0), None);
        ui.set_user_data(w, Box::new(41u32));
        *ui.user_data_mut::<u32>(w).unwrap() += 1;
        assert_eq!(ui.user_data::<u32>(w), Some(&42));
        assert!(ui.user_data::<String>(w).is_none());
    }
}

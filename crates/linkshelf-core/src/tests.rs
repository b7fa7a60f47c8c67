#[cfg(test)]
mod tests {
    use crate::clock::*;
    use crate::effects::*;
    use crate::error::HostError;
    use crate::geometry::*;
    use crate::node::*;
    use crate::signal::*;
    use crate::timers::*;
    use crate::viewport::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use web_time::Duration;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscriber_can_read_signal() {
        let sig = signal(0);
        let seen = Rc::new(Cell::new(-1));

        sig.subscribe({
            let sig = sig.clone();
            let seen = seen.clone();
            move |_| seen.set(sig.get())
        });

        sig.set(7);
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn test_signal_unsubscribe() {
        let sig = signal(0);
        let calls = Rc::new(Cell::new(0));

        let id = sig.subscribe({
            let calls = calls.clone();
            move |_| calls.set(calls.get() + 1)
        });
        sig.set(1);
        assert!(sig.unsubscribe(id));
        assert!(!sig.unsubscribe(id));
        sig.set(2);

        assert_eq!(calls.get(), 1);
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn test_dispose_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let d = on_unmount({
            let runs = runs.clone();
            move || runs.set(runs.get() + 1)
        });

        assert!(!d.is_disposed());
        d.run();
        d.clone().run();
        assert!(d.is_disposed());
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_rect_vertical_overlap() {
        let a = Rect {
            x: 0.0,
            y: 100.0,
            w: 10.0,
            h: 200.0,
        };
        let b = Rect {
            x: 0.0,
            y: 250.0,
            w: 10.0,
            h: 100.0,
        };
        assert_eq!(a.vertical_overlap(&b), 50.0);
        assert_eq!(a.expand_y(100.0).y, 0.0);
        assert_eq!(a.expand_y(100.0).h, 400.0);
        assert_eq!(a.expand_y(-500.0).h, 0.0);

        let far = Rect { y: 1000.0, ..b };
        assert_eq!(a.vertical_overlap(&far), 0.0);
        assert!(a.contains(Vec2 { x: 5.0, y: 150.0 }));
    }

    #[test]
    fn test_node_append_moves_between_parents() {
        let a = Node::new("div");
        let b = Node::new("div");
        let child = Node::new("span");

        a.append_child(&child).unwrap();
        b.append_child(&child).unwrap();

        assert_eq!(a.child_count(), 0);
        assert_eq!(b.child_count(), 1);
        assert_eq!(child.parent(), Some(b.clone()));
    }

    #[test]
    fn test_node_rejects_cycle() {
        let outer = Node::new("div");
        let inner = Node::new("div");
        outer.append_child(&inner).unwrap();

        let err = inner.append_child(&outer).unwrap_err();
        assert_eq!(
            err,
            HostError::HierarchyCycle {
                parent: inner.id(),
                child: outer.id(),
            }
        );
        assert!(matches!(
            outer.append_child(&outer),
            Err(HostError::HierarchyCycle { .. })
        ));
    }

    #[test]
    fn test_node_remove_child_not_a_child() {
        let a = Node::new("div");
        let stranger = Node::new("div");
        assert!(matches!(
            a.remove_child(&stranger),
            Err(HostError::NotAChild { .. })
        ));
        assert!(!stranger.remove());
    }

    #[test]
    fn test_node_clear_children_detaches() {
        let list = Node::new("ul");
        let items: Vec<Node> = (0..3).map(|_| Node::new("li")).collect();
        for item in &items {
            list.append_child(item).unwrap();
        }

        list.clear_children();
        assert_eq!(list.child_count(), 0);
        assert!(items.iter().all(|i| !i.is_attached()));
    }

    #[test]
    fn test_node_query_class_document_order() {
        let root = Node::new("div").with_class("lazy");
        let first = Node::new("img").with_class("lazy").with_attr("alt", "first");
        let wrapper = Node::new("div");
        let second = Node::new("img").with_class("lazy").with_attr("alt", "second");
        wrapper.append_child(&second).unwrap();
        root.append_child(&first).unwrap();
        root.append_child(&wrapper).unwrap();

        let found = root.query_class("lazy");
        assert_eq!(found.len(), 3);
        assert_eq!(found[0], root);
        assert_eq!(found[1].attr("alt").as_deref(), Some("first"));
        assert_eq!(found[2].attr("alt").as_deref(), Some("second"));
    }

    #[test]
    fn test_node_attrs_and_classes() {
        let n = Node::new("img");
        n.set_attr("data-src", "a.png");
        n.add_class("lazy-image");
        n.add_class("lazy-image");

        assert_eq!(n.classes(), vec!["lazy-image".to_string()]);
        assert_eq!(n.remove_attr("data-src").as_deref(), Some("a.png"));
        assert!(!n.has_attr("data-src"));
        assert!(n.remove_class("lazy-image"));
        assert!(!n.remove_class("lazy-image"));
    }

    #[test]
    fn test_node_bounds_from_style() {
        let n = Node::new("div");
        n.update_style(|s| {
            s.position_type = Some(PositionType::Absolute);
            s.offset_top = Some(400.0);
            s.height = Some(200.0);
        });
        let b = n.bounds();
        assert_eq!(b.y, 400.0);
        assert_eq!(b.bottom(), 600.0);
    }

    #[test]
    fn test_node_outline() {
        let card = Node::new("div")
            .with_class("card")
            .with_attr("data-index", "3")
            .with_child(Node::new("span").with_text("hi"));
        card.update_style(|s| s.offset_top = Some(600.0));

        assert_eq!(
            card.outline(),
            "div top=600 data-index=\"3\" .card\n  span \"hi\"\n"
        );
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let clock = TestClock::new();
        let timers = Timers::new(clock.clone());
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, ms) in [("b", 200u64), ("a", 100), ("c", 200)] {
            let log = log.clone();
            timers.set_timeout(Duration::from_millis(ms), move || log.borrow_mut().push(name));
        }

        clock.advance(Duration::from_millis(150));
        assert_eq!(timers.run_due(), 1);
        clock.advance(Duration::from_millis(50));
        assert_eq!(timers.run_due(), 2);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_timers_next_due() {
        let clock = TestClock::new();
        let timers = Timers::new(clock.clone());
        assert_eq!(timers.next_due(), None);

        let start = timers.now();
        let late = timers.set_timeout(Duration::from_millis(300), || {});
        timers.set_timeout(Duration::from_millis(100), || {});
        assert_eq!(timers.next_due(), Some(start + Duration::from_millis(100)));

        clock.advance(Duration::from_millis(100));
        timers.run_due();
        assert_eq!(timers.next_due(), timers.due_at(late));
    }

    #[test]
    fn test_timers_clear_timeout() {
        let clock = TestClock::new();
        let timers = Timers::new(clock.clone());
        let fired = Rc::new(Cell::new(false));

        let id = timers.set_timeout(Duration::from_millis(10), {
            let fired = fired.clone();
            move || fired.set(true)
        });
        assert!(timers.is_pending(id));
        assert!(timers.clear_timeout(id));
        assert!(!timers.clear_timeout(id));

        clock.advance(Duration::from_millis(10));
        assert_eq!(timers.run_due(), 0);
        assert!(!fired.get());
    }

    #[test]
    fn test_timers_reschedule_waits_for_next_pump() {
        let clock = TestClock::new();
        let timers = Rc::new(Timers::new(clock.clone()));
        let runs = Rc::new(Cell::new(0));

        fn tick(timers: Rc<Timers>, runs: Rc<Cell<u32>>) {
            runs.set(runs.get() + 1);
            let t = timers.clone();
            timers.set_timeout(Duration::ZERO, move || tick(t, runs));
        }

        {
            let t = timers.clone();
            let runs = runs.clone();
            timers.set_timeout(Duration::ZERO, move || tick(t, runs));
        }

        assert_eq!(timers.run_due(), 1);
        assert_eq!(timers.run_due(), 1);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_viewport_scroll_clamps_to_content() {
        let vp = ScrollViewport::new(Size::new(300.0, 800.0));
        let content = Node::new("div");
        content.update_style(|s| s.height = Some(2000.0));
        vp.set_content(&content);

        assert_eq!(vp.scroll_to(5000.0), 1200.0);
        assert_eq!(vp.scroll_to(-10.0), 0.0);
        assert_eq!(vp.scroll_by(1500.0), 300.0);
        assert_eq!(vp.scroll_offset(), 1200.0);

        content.update_style(|s| s.height = Some(1000.0));
        vp.clamp_to_content();
        assert_eq!(vp.scroll_offset(), 200.0);
    }

    #[test]
    fn test_viewport_listeners_fire_on_change_only() {
        let vp = ScrollViewport::new(Size::new(300.0, 800.0));
        let scrolls = Rc::new(Cell::new(0));
        let resizes = Rc::new(Cell::new(0));

        let scroll_listener = vp.on_scroll({
            let scrolls = scrolls.clone();
            move |_| scrolls.set(scrolls.get() + 1)
        });
        let _resize_listener = vp.on_resize({
            let resizes = resizes.clone();
            move |_| resizes.set(resizes.get() + 1)
        });
        assert_eq!(vp.listener_count(), 2);

        vp.scroll_to(10.0);
        vp.scroll_to(10.0);
        vp.resize(Size::new(300.0, 800.0));
        vp.resize(Size::new(300.0, 600.0));
        assert_eq!(scrolls.get(), 1);
        assert_eq!(resizes.get(), 1);

        scroll_listener.run();
        vp.scroll_to(20.0);
        assert_eq!(scrolls.get(), 1);
        assert_eq!(vp.listener_count(), 1);
    }

    #[test]
    fn test_viewport_unmount_and_weak() {
        let vp = ScrollViewport::new(Size::new(100.0, f32::NAN));
        assert_eq!(vp.viewport_height(), 0.0);

        let weak = vp.downgrade();
        assert!(weak.upgrade().is_some_and(|v| v.is_mounted()));
        vp.unmount();
        assert!(weak.upgrade().is_some_and(|v| !v.is_mounted()));
        drop(vp);
        assert!(weak.upgrade().is_none());
    }
}

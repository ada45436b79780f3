use dashprop::{
    DashboardError, DashboardModel, DashboardPanel, DashboardViewModel, GroupedDashboardViewModel,
    ModelEvent, OwnerId, PropertyKey, PropertySurface, PropertyValue, ProxyId, SimNode, ValueKind,
};

fn key(owner: u64, name: &str) -> PropertyKey {
    PropertyKey::new(OwnerId(owner), name)
}

fn model_with_motor() -> DashboardModel {
    let motor = SimNode::new(4, "Motor")
        .with_property("Torque", 1.5)
        .with_property("Label", "left")
        .shared();
    let mut model = DashboardModel::default();
    model.add_node_property(motor.clone(), "Torque").unwrap();
    model.add_node_property(motor, "Label").unwrap();
    model
}

#[test]
fn dashboard_items_describe_each_property() {
    let mut model = model_with_motor();
    let g = model.add_group(Some("Drive")).unwrap();
    model.add_member(g, &key(4, "Torque")).unwrap();

    let view = DashboardViewModel::new(&mut model);
    let items = view.items();
    assert_eq!(items.len(), 2);

    let torque = &items[0];
    assert_eq!(torque.id, ProxyId::Single(key(4, "Torque")));
    assert_eq!(torque.name, "Torque");
    assert_eq!(torque.value, Some(PropertyValue::Float(1.5)));
    assert_eq!(torque.kind, Some(ValueKind::Float));
    assert_eq!(torque.category, "Motor");
    assert_eq!(torque.group.as_deref(), Some("Drive"));
    assert!(torque.read_only);

    let label = view.item(&ProxyId::Single(key(4, "Label"))).unwrap();
    assert_eq!(label.display, "left");
    assert_eq!(label.group, None);
    assert!(!label.read_only);
    assert!(view.item(&ProxyId::Group(g)).is_none());
}

#[test]
fn grouped_items_describe_each_group() {
    let mut model = model_with_motor();
    let mut groups = GroupedDashboardViewModel::new(&mut model);
    let g = groups.add_grouped_property().unwrap();
    let items = groups.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Group 1");
    assert_eq!(items[0].category, "Groups");
    assert_eq!(items[0].display, "0 properties");

    groups.rename(&ProxyId::Group(g), "Drive").unwrap();
    assert_eq!(groups.item(&ProxyId::Group(g)).unwrap().name, "Drive");
    groups.remove_property(&ProxyId::Group(g)).unwrap();
    assert!(groups.items().is_empty());
}

#[test]
fn writes_are_forwarded_and_type_checked() {
    let mut model = model_with_motor();
    let mut view = DashboardViewModel::new(&mut model);
    let torque = ProxyId::Single(key(4, "Torque"));

    view.set_value(&torque, PropertyValue::Float(3.0)).unwrap();
    assert_eq!(view.item(&torque).unwrap().display, "3");
    assert!(matches!(
        view.set_value(&torque, PropertyValue::Bool(true)),
        Err(DashboardError::InvalidAssignment { .. })
    ));
    assert!(matches!(
        view.set_value(&ProxyId::Single(key(4, "Missing")), PropertyValue::Float(1.0)),
        Err(DashboardError::NotFound(_))
    ));
}

#[test]
fn each_surface_only_accepts_its_own_variant() {
    let mut model = model_with_motor();
    let g = model.add_group(None).unwrap();
    assert!(matches!(
        DashboardViewModel::new(&mut model).remove_property(&ProxyId::Group(g)),
        Err(DashboardError::NotFound(_))
    ));
    assert!(matches!(
        GroupedDashboardViewModel::new(&mut model)
            .remove_property(&ProxyId::Single(key(4, "Torque"))),
        Err(DashboardError::NotFound(_))
    ));
    assert_eq!(model.groups().len(), 1);
    assert_eq!(model.dashboard().len(), 2);
}

#[test]
fn structural_events_collapse_to_one_change_per_surface() {
    let mut model = model_with_motor();
    let events = model.subscribe();
    let g = model.add_group(None).unwrap();
    model.add_member(g, &key(4, "Torque")).unwrap();
    model.remove_group(g).unwrap();
    let batch: Vec<ModelEvent> = events.try_iter().collect();
    assert_eq!(batch.len(), 3);

    assert!(DashboardViewModel::new(&mut model).changed(&batch));
    assert!(GroupedDashboardViewModel::new(&mut model).changed(&batch));

    let only_added = [ModelEvent::GroupAdded(g)];
    assert!(!DashboardViewModel::new(&mut model).changed(&only_added));
    let property_added = [ModelEvent::PropertyAdded(key(4, "Torque"))];
    assert!(!GroupedDashboardViewModel::new(&mut model).changed(&property_added));

    let redraw_only = [
        ModelEvent::ValueChanged(ProxyId::Single(key(4, "Torque"))),
        ModelEvent::EditabilityChanged { enabled: false },
    ];
    assert!(!DashboardViewModel::new(&mut model).changed(&redraw_only));
    assert!(!GroupedDashboardViewModel::new(&mut model).changed(&redraw_only));
}

#[test]
fn panel_follows_group_selection() {
    let mut model = model_with_motor();
    let g = model.add_group(Some("Drive")).unwrap();
    let mut panel = DashboardPanel::new(model);

    assert_eq!(panel.actions(), Default::default());
    panel.select_group(Some(g));
    assert!(panel.actions().remove_group && panel.actions().rename_group);
    assert!(panel.members().is_empty());

    // Nothing selected on the flat surface: adding is a no-op.
    panel.add_selected_to_group().unwrap();
    assert!(panel.members().is_empty());

    panel.select_property(Some(key(4, "Torque")));
    panel.add_selected_to_group().unwrap();
    assert_eq!(panel.members()[0].full_name, "Motor.Torque");
    let refresh = panel.take_refresh();
    assert!(refresh.properties && refresh.groups && refresh.members);

    panel.select_group(Some(g));
    panel.select_property(Some(key(4, "Label")));
    assert!(matches!(
        panel.add_selected_to_group(),
        Err(DashboardError::IncompatibleMember { .. })
    ));

    panel.select_group(Some(g));
    panel.remove_from_group(&[key(4, "Torque")]).unwrap();
    assert!(panel.members().is_empty());

    panel.select_group(Some(g));
    panel.rename_selected_group("Motors").unwrap();
    assert_eq!(panel.model().groups().get(g).unwrap().name(), "Motors");

    panel.select_group(Some(g));
    panel.remove_selected_group().unwrap();
    assert_eq!(panel.selected_group(), None);
    assert!(panel.model().groups().is_empty());
    assert!(!panel.actions().remove_group);
}

#[test]
fn panel_remove_selected_property_clears_selection() {
    let mut panel = DashboardPanel::new(model_with_motor());
    panel.select_property(Some(key(4, "Label")));
    assert!(panel.actions().remove_property);
    panel.remove_selected_property().unwrap();
    assert_eq!(panel.selected_property(), None);
    assert!(!panel.actions().remove_property);
    assert_eq!(panel.model().dashboard().len(), 1);

    assert!(matches!(
        panel.remove_selected_property(),
        Err(DashboardError::NotFound(_))
    ));
}

#[test]
fn panel_edit_lock_refreshes_properties() {
    let mut panel = DashboardPanel::new(model_with_motor());
    panel.take_refresh();
    panel.set_can_edit_node_properties(false);
    assert!(panel.take_refresh().properties);
    let items = panel.dashboard_view().items();
    assert!(items.iter().all(|i| i.read_only));
}

#[test]
fn panel_value_write_keeps_remove_enabled() {
    let mut panel = DashboardPanel::new(model_with_motor());
    let g = panel.model_mut().add_group(Some("Drive")).unwrap();
    panel.pump_events();
    panel.select_property(Some(key(4, "Torque")));
    panel.select_group(Some(g));
    panel.take_refresh();

    panel
        .dashboard_view()
        .set_value(&ProxyId::Single(key(4, "Torque")), PropertyValue::Float(2.0))
        .unwrap();
    assert_eq!(panel.pump_events(), 1);
    assert!(panel.actions().remove_property);
    assert!(panel.actions().rename_group);
    assert!(panel.take_refresh().properties);

    panel.set_can_edit_node_properties(false);
    assert!(panel.actions().remove_property);
    assert!(panel.actions().remove_group);
    assert!(panel.take_refresh().properties);
}

#[test]
fn panel_unlock_shows_owner_read_only_properties_as_locked() {
    let gain = SimNode::new(1, "Gain")
        .with_property("K", 2.0)
        .with_read_only_property("Inputs", 1i64)
        .shared();
    let mut model = DashboardModel::default();
    model.add_node_property(gain.clone(), "K").unwrap();
    model.add_node_property(gain, "Inputs").unwrap();
    let mut panel = DashboardPanel::new(model);

    panel.set_can_edit_node_properties(false);
    panel.set_can_edit_node_properties(true);
    let inputs = ProxyId::Single(key(1, "Inputs"));
    assert!(panel.dashboard_view().item(&inputs).unwrap().read_only);
    assert!(!panel.dashboard_view().item(&ProxyId::Single(key(1, "K"))).unwrap().read_only);
    assert!(matches!(
        panel.dashboard_view().set_value(&inputs, PropertyValue::Int(2)),
        Err(DashboardError::ReadOnly(_))
    ));
}

#[test]
fn panel_ignores_selection_of_a_removed_group() {
    let mut model = model_with_motor();
    let g = model.add_group(Some("Drive")).unwrap();
    model.remove_group(g).unwrap();
    let mut panel = DashboardPanel::new(model);

    panel.select_group(Some(g));
    assert_eq!(panel.selected_group(), None);
    assert_eq!(panel.actions(), Default::default());
    assert!(panel.members().is_empty());
    assert!(matches!(
        panel.rename_selected_group("Motors"),
        Err(DashboardError::NotFound(_))
    ));
}

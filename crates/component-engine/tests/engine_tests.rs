//! End-to-end engine tests: structural edits, positioning, automatic
//! diameters and geometry recompute through the mock kernel.

use component_engine::{
    Component, ComponentData, ComponentId, Diameter, Engine, EngineError, NoseData, ShoulderData,
    TransitionData, TubeData,
};
use geometry_kernel::{GeometryKernel, MockKernel};
use rocket_types::{AxialMethod, CapStyle, ShapeFamily, ShapeStyle};

fn nose(length: f64, diameter: f64) -> Component {
    Component::nose_cone(
        "nose",
        NoseData {
            family: ShapeFamily::Ogive,
            style: ShapeStyle::Solid,
            length,
            diameter: Diameter::Manual(diameter),
            thickness: 0.0,
            coefficient: 0.0,
            ogive_diameter: 0.0,
            blunted_diameter: 0.0,
            resolution: 32,
            shoulder: None,
            cap: CapStyle::Solid,
            cap_bar_width: 0.0,
        },
    )
}

fn tube(length: f64, diameter: f64) -> Component {
    Component::body_tube(
        "tube",
        TubeData {
            length,
            outer_diameter: Diameter::Manual(diameter),
            thickness: 1.0,
        },
    )
}

fn cone_transition(length: f64, fore: Diameter, aft: Diameter) -> Component {
    Component::transition(
        "transition",
        TransitionData {
            family: ShapeFamily::Cone,
            style: ShapeStyle::Solid,
            length,
            fore_diameter: fore,
            aft_diameter: aft,
            thickness: 0.0,
            core_diameter: 0.0,
            coefficient: 0.0,
            clipped: true,
            resolution: 32,
            fore_shoulder: None,
            aft_shoulder: None,
            fore_cap: CapStyle::Solid,
            aft_cap: CapStyle::Solid,
            fore_cap_bar_width: 0.0,
            aft_cap_bar_width: 0.0,
        },
    )
}

/// Basic rocket: root -> stage -> nose(100) + tube(200, diameter 40).
/// Stage children are stored aft first, so the tube goes in before the
/// nose.
fn basic(kernel: &mut MockKernel) -> (Engine, ComponentId, ComponentId, ComponentId) {
    let mut engine = Engine::new("test rocket");
    let root = engine.root();
    let stage = engine
        .add_child(root, Component::stage("sustainer"), kernel)
        .unwrap();
    let tube_id = engine.add_child(stage, tube(200.0, 40.0), kernel).unwrap();
    let nose_id = engine.add_child(stage, nose(100.0, 40.0), kernel).unwrap();
    (engine, stage, nose_id, tube_id)
}

#[test]
fn adding_components_recomputes_positions_and_geometry() {
    let mut kernel = MockKernel::new();
    let (engine, _, nose_id, tube_id) = basic(&mut kernel);

    let nose = engine.component(nose_id).unwrap();
    let tube = engine.component(tube_id).unwrap();
    assert_eq!(nose.position, 0.0);
    assert_eq!(tube.position, 100.0);
    assert!(nose.geometry.is_some());
    assert!(tube.geometry.is_some());
    assert!(nose.shape_error.is_none());
}

#[test]
fn removing_a_component_shifts_stacked_siblings() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, nose_id, tube_id) = basic(&mut kernel);

    engine.remove_child(nose_id, &mut kernel).unwrap();
    assert_eq!(engine.component(tube_id).unwrap().position, 0.0);
    // The detached subtree survives in the arena.
    assert!(engine.component(nose_id).is_ok());
}

#[test]
fn automatic_fore_diameter_follows_the_previous_component() {
    let mut kernel = MockKernel::new();
    let (mut engine, stage, _, tube_id) = basic(&mut kernel);
    // Index 0 of the aft-first child list is the aft end of the stack.
    let trans_id = engine
        .add_child_at(
            stage,
            cone_transition(50.0, Diameter::automatic(), Diameter::Manual(20.0)),
            0,
            &mut kernel,
        )
        .unwrap();

    assert_eq!(engine.fore_diameter(trans_id).unwrap(), 40.0);

    // Shrinking the tube re-resolves the automatic end on the next pass.
    engine.set_aft_radius(tube_id, 10.0, &mut kernel).unwrap();
    assert_eq!(engine.fore_diameter(trans_id).unwrap(), 20.0);
}

#[test]
fn automatic_aft_diameter_matches_the_next_component() {
    let mut kernel = MockKernel::new();
    let mut engine = Engine::new("r");
    let root = engine.root();
    let stage = engine
        .add_child(root, Component::stage("s"), &mut kernel)
        .unwrap();
    engine
        .add_child(stage, tube(200.0, 30.0), &mut kernel)
        .unwrap();
    let nose_id = engine
        .add_child(stage, nose(100.0, 40.0), &mut kernel)
        .unwrap();

    engine
        .set_aft_diameter_automatic(nose_id, true, &mut kernel)
        .unwrap();
    assert_eq!(engine.aft_diameter(nose_id).unwrap(), 30.0);

    // Switching back to manual freezes the resolved value.
    engine
        .set_aft_diameter_automatic(nose_id, false, &mut kernel)
        .unwrap();
    let ComponentData::NoseCone(data) = &engine.component(nose_id).unwrap().data else {
        panic!("expected nose data");
    };
    assert_eq!(data.diameter, Diameter::Manual(30.0));
}

#[test]
fn setting_the_same_radius_skips_the_recompute_pass() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, nose_id, tube_id) = basic(&mut kernel);

    let before = engine.component(tube_id).unwrap().geometry;
    let nose_before = engine.component(nose_id).unwrap().geometry;
    engine.set_aft_radius(tube_id, 20.0, &mut kernel).unwrap();
    assert_eq!(engine.component(tube_id).unwrap().geometry, before);
    assert_eq!(engine.component(nose_id).unwrap().geometry, nose_before);

    // An actual change replaces the solid.
    engine.set_aft_radius(tube_id, 25.0, &mut kernel).unwrap();
    assert_ne!(engine.component(tube_id).unwrap().geometry, before);
}

#[test]
fn method_switch_preserves_physical_placement() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, _, tube_id) = basic(&mut kernel);
    assert_eq!(engine.component(tube_id).unwrap().position, 100.0);

    engine
        .set_axial_method(tube_id, AxialMethod::TopOfParent)
        .unwrap();
    let tube = engine.component(tube_id).unwrap();
    assert_eq!(tube.position, 100.0);
    assert_eq!(tube.axial_method, AxialMethod::TopOfParent);
    assert_eq!(tube.axial_offset, 100.0);
}

#[test]
fn invalid_structure_is_rejected_and_rolled_back() {
    let mut kernel = MockKernel::new();
    let (mut engine, stage, _, tube_id) = basic(&mut kernel);
    let arena_len = engine.tree.arena.len();

    // A stage cannot hold another stage.
    let err = engine
        .add_child(stage, Component::stage("inner"), &mut kernel)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidChild { .. }));
    assert_eq!(engine.tree.arena.len(), arena_len);

    // A tube cannot hold a tube either.
    let err = engine
        .add_child(tube_id, tube(10.0, 10.0), &mut kernel)
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidChild { .. }));
}

#[test]
fn failed_recompute_keeps_the_previous_solid() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, nose_id, _) = basic(&mut kernel);
    let before = engine.component(nose_id).unwrap().geometry;
    assert!(before.is_some());

    engine.set_length(nose_id, -5.0, &mut kernel).unwrap();
    let nose = engine.component(nose_id).unwrap();
    assert_eq!(nose.geometry, before);
    assert!(nose.shape_error.is_some());

    // A valid length clears the diagnostic.
    engine.set_length(nose_id, 80.0, &mut kernel).unwrap();
    let nose = engine.component(nose_id).unwrap();
    assert!(nose.shape_error.is_none());
    assert_ne!(nose.geometry, before);
}

#[test]
fn non_finite_offset_is_rejected_before_any_state_change() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, _, tube_id) = basic(&mut kernel);

    let err = engine
        .set_axial_offset(tube_id, f64::NAN, &mut kernel)
        .unwrap_err();
    assert!(matches!(err, EngineError::NonFiniteOffset));
    assert_eq!(engine.component(tube_id).unwrap().axial_offset, 0.0);
}

#[test]
fn config_listeners_mirror_setter_calls() {
    let mut kernel = MockKernel::new();
    let (mut engine, stage, _, _) = basic(&mut kernel);
    let a = engine
        .add_child(
            stage,
            cone_transition(50.0, Diameter::Manual(40.0), Diameter::Manual(20.0)),
            &mut kernel,
        )
        .unwrap();
    let b = engine
        .add_child(
            stage,
            cone_transition(50.0, Diameter::Manual(20.0), Diameter::Manual(10.0)),
            &mut kernel,
        )
        .unwrap();

    // Mutual registration; the visited guard stops the ping-pong.
    engine.register_config_listener(a, b).unwrap();
    engine.register_config_listener(b, a).unwrap();

    engine.set_fore_radius(a, 15.0, &mut kernel).unwrap();
    for id in [a, b] {
        let ComponentData::Transition(data) = &engine.component(id).unwrap().data else {
            panic!("expected transition data");
        };
        assert_eq!(data.fore_diameter, Diameter::Manual(30.0));
    }

    engine.unregister_config_listener(a, b).unwrap();
    engine.set_fore_radius(a, 5.0, &mut kernel).unwrap();
    let ComponentData::Transition(data) = &engine.component(b).unwrap().data else {
        panic!("expected transition data");
    };
    assert_eq!(data.fore_diameter, Diameter::Manual(30.0));
}

#[test]
fn oversized_wall_is_clamped_to_the_smaller_end() {
    let mut kernel = MockKernel::new();
    let (mut engine, stage, _, _) = basic(&mut kernel);
    let mut data = cone_transition(50.0, Diameter::Manual(12.0), Diameter::Manual(30.0));
    if let ComponentData::Transition(d) = &mut data.data {
        d.style = ShapeStyle::Hollow;
        d.thickness = 4.0;
    }
    let trans_id = engine.add_child(stage, data, &mut kernel).unwrap();

    // Wall 4 exceeds only the new aft radius 2; no clamp yet.
    engine.set_aft_radius(trans_id, 2.0, &mut kernel).unwrap();
    let ComponentData::Transition(d) = &engine.component(trans_id).unwrap().data else {
        panic!("expected transition data");
    };
    assert_eq!(d.thickness, 4.0);

    // Now it exceeds both ends (3 and 2) and drops to the smaller one.
    engine.set_fore_radius(trans_id, 3.0, &mut kernel).unwrap();
    let ComponentData::Transition(d) = &engine.component(trans_id).unwrap().data else {
        panic!("expected transition data");
    };
    assert_eq!(d.thickness, 2.0);
}

#[test]
fn recompute_is_deterministic_for_unchanged_parameters() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, nose_id, _) = basic(&mut kernel);
    let first = engine.component(nose_id).unwrap().geometry.unwrap();
    let first_samples = kernel.meridian_samples(&first).unwrap().to_vec();

    engine
        .set_axial_offset(nose_id, 0.0, &mut kernel)
        .unwrap();
    let second = engine.component(nose_id).unwrap().geometry.unwrap();
    let second_samples = kernel.meridian_samples(&second).unwrap();
    assert_eq!(first_samples, second_samples);
}

#[test]
fn payload_setters_fire_a_recompute() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, nose_id, tube_id) = basic(&mut kernel);

    let before = engine.component(tube_id).unwrap().geometry;
    engine.set_thickness(tube_id, 2.0, &mut kernel).unwrap();
    assert_ne!(engine.component(tube_id).unwrap().geometry, before);

    // Same value again: no recompute pass runs.
    let before = engine.component(tube_id).unwrap().geometry;
    engine.set_thickness(tube_id, 2.0, &mut kernel).unwrap();
    assert_eq!(engine.component(tube_id).unwrap().geometry, before);

    let before = engine.component(nose_id).unwrap().geometry;
    engine
        .set_family(nose_id, ShapeFamily::PowerSeries, &mut kernel)
        .unwrap();
    engine.set_coefficient(nose_id, 0.75, &mut kernel).unwrap();
    let nose = engine.component(nose_id).unwrap();
    assert_ne!(nose.geometry, before);
    assert!(nose.shape_error.is_none());
}

#[test]
fn payload_setters_mirror_to_listeners() {
    let mut kernel = MockKernel::new();
    let (mut engine, stage, _, tube_id) = basic(&mut kernel);
    let other = engine
        .add_child(stage, tube(50.0, 40.0), &mut kernel)
        .unwrap();
    engine.register_config_listener(tube_id, other).unwrap();

    engine.set_thickness(tube_id, 3.0, &mut kernel).unwrap();
    for id in [tube_id, other] {
        let ComponentData::BodyTube(d) = &engine.component(id).unwrap().data else {
            panic!("expected tube data");
        };
        assert_eq!(d.thickness, 3.0);
    }
}

#[test]
fn resolution_setter_changes_the_sampling() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, nose_id, _) = basic(&mut kernel);
    let solid = engine.component(nose_id).unwrap().geometry.unwrap();
    let before = kernel.meridian_samples(&solid).unwrap().len();

    engine.set_resolution(nose_id, 64, &mut kernel).unwrap();
    let solid = engine.component(nose_id).unwrap().geometry.unwrap();
    assert!(kernel.meridian_samples(&solid).unwrap().len() > before);
}

#[test]
fn clipped_flag_setter_rebuilds_the_profile() {
    let mut kernel = MockKernel::new();
    let (mut engine, stage, _, _) = basic(&mut kernel);
    let trans_id = engine
        .add_child_at(
            stage,
            cone_transition(50.0, Diameter::Manual(20.0), Diameter::Manual(40.0)),
            0,
            &mut kernel,
        )
        .unwrap();
    // The cone meridian is clip-invariant; a curved family is not.
    engine
        .set_family(trans_id, ShapeFamily::HaackSeries, &mut kernel)
        .unwrap();
    let solid = engine.component(trans_id).unwrap().geometry.unwrap();
    let clipped = kernel.meridian_samples(&solid).unwrap().to_vec();

    engine.set_clipped(trans_id, false, &mut kernel).unwrap();
    let solid = engine.component(trans_id).unwrap().geometry.unwrap();
    let unclipped = kernel.meridian_samples(&solid).unwrap();
    assert_ne!(clipped, unclipped);
}

#[test]
fn shoulder_setter_extends_the_solid() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, nose_id, _) = basic(&mut kernel);

    engine
        .set_aft_shoulder(
            nose_id,
            Some(ShoulderData {
                length: 15.0,
                diameter: Diameter::Manual(36.0),
                thickness: 2.0,
            }),
            &mut kernel,
        )
        .unwrap();
    let solid = engine.component(nose_id).unwrap().geometry.unwrap();
    let bbox = kernel.bounding_box(&solid).unwrap();
    assert!((bbox.length_x() - 115.0).abs() < 1e-6);

    engine.set_aft_shoulder(nose_id, None, &mut kernel).unwrap();
    let solid = engine.component(nose_id).unwrap().geometry.unwrap();
    let bbox = kernel.bounding_box(&solid).unwrap();
    assert!((bbox.length_x() - 100.0).abs() < 1e-6);
}

#[test]
fn cap_setters_swap_the_base_pattern() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, nose_id, _) = basic(&mut kernel);
    engine.set_thickness(nose_id, 2.0, &mut kernel).unwrap();
    engine
        .set_style(nose_id, ShapeStyle::Capped, &mut kernel)
        .unwrap();
    let solid = engine.component(nose_id).unwrap().geometry.unwrap();
    assert!(!kernel.meridian_samples(&solid).unwrap().is_empty());

    engine
        .set_aft_cap_bar_width(nose_id, 6.0, &mut kernel)
        .unwrap();
    engine
        .set_aft_cap(nose_id, CapStyle::Bar, &mut kernel)
        .unwrap();
    let nose = engine.component(nose_id).unwrap();
    assert!(nose.shape_error.is_none());
    // A bar cap fuses slabs onto the wall, so the solid is no longer a
    // single surface of revolution.
    assert!(kernel
        .meridian_samples(&nose.geometry.unwrap())
        .unwrap()
        .is_empty());
}

#[test]
fn angle_offset_setter_updates_rotation() {
    let mut kernel = MockKernel::new();
    let (mut engine, _, _, tube_id) = basic(&mut kernel);

    engine.set_angle_offset(tube_id, 90.0, &mut kernel).unwrap();
    let tube = engine.component(tube_id).unwrap();
    assert_eq!(tube.rotation, 90.0);

    let err = engine
        .set_angle_offset(tube_id, f64::NAN, &mut kernel)
        .unwrap_err();
    assert!(matches!(err, EngineError::NonFiniteOffset));
    assert_eq!(engine.component(tube_id).unwrap().angle_offset, 90.0);
}

#[test]
fn reordering_children_updates_the_stack() {
    let mut kernel = MockKernel::new();
    let mut engine = Engine::new("r");
    let root = engine.root();
    let stage = engine
        .add_child(root, Component::stage("s"), &mut kernel)
        .unwrap();
    let a = engine.add_child(stage, tube(100.0, 40.0), &mut kernel).unwrap();
    let b = engine.add_child(stage, tube(50.0, 40.0), &mut kernel).unwrap();
    // Aft-first storage puts the later insertion at the fore end.
    assert_eq!(engine.component(b).unwrap().position, 0.0);
    assert_eq!(engine.component(a).unwrap().position, 50.0);

    assert!(engine.move_child_up(b, &mut kernel).unwrap());
    assert_eq!(engine.component(a).unwrap().position, 0.0);
    assert_eq!(engine.component(b).unwrap().position, 100.0);

    // Already at the front of the stored list; nothing to do.
    assert!(!engine.move_child_up(b, &mut kernel).unwrap());
}

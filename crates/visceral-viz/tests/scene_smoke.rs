//! End-to-end scene assembly and frame convergence.

use visceral_core::{OrganId, ViewState};
use visceral_mesh::{Mesh, NORMAL_TOLERANCE};
use visceral_viz::{
    modulate_organ, MaterialState, ModulatorConfig, SceneAnimator, SceneGeometry, ViewerConfig,
};

fn assert_normal_complete(name: &str, mesh: &Mesh) {
    assert!(!mesh.is_empty(), "{name} is empty");
    assert_eq!(mesh.positions.len(), mesh.normals.len(), "{name}");
    for (i, n) in mesh.normals.iter().enumerate() {
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() <= NORMAL_TOLERANCE, "{name}: normal {i} has length {len}");
    }
    if let Some(indices) = &mesh.indices {
        assert!(indices.iter().all(|&i| (i as usize) < mesh.positions.len()), "{name}");
    }
}

#[test]
fn test_full_scene_is_normal_complete() {
    let scene = SceneGeometry::synthesize(&ViewerConfig::default());

    assert_eq!(scene.organs.len(), 16);
    for (id, mesh) in &scene.organs {
        assert_normal_complete(id.as_str(), mesh);
    }

    assert_eq!(scene.ribs.len(), 24);
    for (i, rib) in scene.ribs.iter().enumerate() {
        assert_normal_complete(&format!("rib {i}"), rib);
    }

    assert_normal_complete("spine", &scene.spine);
    assert_normal_complete("body shell", &scene.body_shell);
    assert_eq!(scene.mesh_count(), 42);
}

#[test]
fn test_serial_and_parallel_scenes_match() {
    let parallel = SceneGeometry::synthesize(&ViewerConfig::default().with_parallel(true));
    let serial = SceneGeometry::synthesize(&ViewerConfig::default().with_parallel(false));

    assert_eq!(parallel.organs, serial.organs);
    assert_eq!(parallel.ribs, serial.ribs);
    assert_eq!(parallel.spine, serial.spine);
    assert_eq!(parallel.body_shell, serial.body_shell);
}

#[test]
fn test_heart_selection_converges_gradually() {
    let config = ModulatorConfig::default();
    let heart = OrganId::Heart.descriptor();
    let view = ViewState::default().with_selected(OrganId::Heart).with_xray(false);

    let before = MaterialState {
        opacity: 0.15,
        ..MaterialState::organ(heart)
    };
    let after = modulate_organ(&before, heart, &view, 1.25, &config);

    assert!(after.opacity > before.opacity, "opacity did not move toward 1.0");
    assert!(after.opacity < 1.0, "opacity jumped to its target");
}

#[test]
fn test_animator_selection_dims_the_rest() {
    let mut animator = SceneAnimator::default();
    let view = ViewState::default().with_selected(OrganId::Heart);

    for frame in 0..120 {
        animator.update(&view, frame as f32 / 60.0);
    }

    let heart = animator.organ(OrganId::Heart).unwrap();
    let liver = animator.organ(OrganId::Liver).unwrap();
    assert!(heart.opacity > 0.99);
    assert!(liver.opacity < 0.2);
    assert!(heart.emissive_intensity > liver.emissive_intensity);
    assert!(animator.skeleton().opacity < 0.25);
    assert!(animator.body_shell().opacity < 0.08);
}

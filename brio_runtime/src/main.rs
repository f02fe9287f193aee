//! Headless demo driver: builds a small scene, runs it for a few synthetic
//! frames, feeds it a click, and logs what happened. Rendering goes to a
//! `DrawList`, so the whole run works without a window.

use brio_animation::{AnimationScript, Timeline};
use brio_nodes::{DrawList, MouseButton, MouseButtonArgs};
use brio_scene::{SceneError, World};
use brio_structs::{Alignment, Color, Point, Rect, Size};
use log::info;

const VIEWPORT: Rect = Rect::new(0, 0, 640, 360);
const FRAME_DT: f64 = 0.25;

fn build_stage(world: &mut World) -> Result<(), SceneError> {
    let scene_id = world.create_scene("main")?;
    world.scenes.set_current(scene_id);

    let panel = world.create_node("panel");
    {
        let node = world.nodes.get_mut(panel).expect("just created");
        node.size = Size::new(200, 120);
        node.alignment = Alignment::MiddleCenter;
        node.background_color = Color::rgb(60, 60, 80);
    }

    let button = world.create_node("button");
    {
        let node = world.nodes.get_mut(button).expect("just created");
        node.size = Size::new(64, 24);
        node.alignment = Alignment::BottomRight;
        node.position = Point::new(-8, -8);
        node.background_color = Color::rgb(90, 140, 90);
        node.events.mouse_down.register(|node, args| {
            info!(
                "button pressed at {},{} with {:?}",
                args.local_position.x, args.local_position.y, args.button
            );
            node.background_color = Color::rgb(140, 200, 140);
        });
    }
    world.nodes.add_child(panel, button);

    world.add_script::<AnimationScript>(panel);
    let script = world
        .get_script_mut::<AnimationScript>(panel)
        .expect("just attached");
    script.timeline = Timeline::new(1.5, 0.5);
    script
        .events
        .started
        .register(|_, _| info!("panel animation started"));
    script
        .events
        .updated
        .register(|_, args| info!("panel animation progress {:.2}", args.progress));
    script
        .events
        .stopped
        .register(|timeline, _| info!("panel animation stopped at {:.2}s", timeline.elapsed()));
    script.timeline.play();

    let scene = world.scenes.get_mut(scene_id).expect("just created");
    scene.background_color = Color::rgb(24, 24, 32);
    scene.add_layer(None);
    scene.add(panel, None);
    Ok(())
}

fn main() -> Result<(), SceneError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut world = World::new();
    build_stage(&mut world)?;
    info!(
        "stage ready: {} nodes, {} scenes",
        world.nodes.len(),
        world.scenes.len()
    );

    let mut canvas = DrawList::new();
    for frame in 0..10 {
        world.update(FRAME_DT);

        canvas.clear();
        world.render(&mut canvas, VIEWPORT);

        // Press the button halfway through the run. The panel sits centered
        // at (220, 120); the button hugs its bottom-right corner.
        if frame == 5 {
            world.raise_mouse_down(
                VIEWPORT,
                MouseButtonArgs {
                    local_position: Point::new(400, 220),
                    button: MouseButton::Left,
                    clicks: 1,
                },
            );
        }

        info!(
            "frame {frame}: {} draw commands, {:.2}s elapsed",
            canvas.commands.len(),
            (frame + 1) as f64 * FRAME_DT
        );
    }

    if let Some(panel) = world.nodes.find_node("panel") {
        world.destroy_node(panel);
    }
    info!("stage torn down: {} nodes remain", world.nodes.len());
    Ok(())
}

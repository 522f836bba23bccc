use super::{Anchor, Behavior, Body, FRICTION_REFERENCE_FPS};
use crate::graph::{AnimationGraph, CellId, IntoNode, NodeId};

/// Hooke spring toward `anchor`.
///
/// `a = -tension * (target - anchor) / mass`, `v += a * dt`.
pub fn spring(
    graph: &mut AnimationGraph,
    body: &Body,
    anchor: &Anchor,
    tension: impl IntoNode,
) -> Behavior {
    let tension = tension.into_node(graph);
    let stiffness = graph.divide(tension, -body.object.mass);

    let dx = graph.sub(body.target.x, anchor.x);
    let ax = graph.multiply(stiffness, dx);
    let step_x = graph.multiply(ax, body.dt);
    let vx = graph.add(body.object.vx, step_x);

    let dy = graph.sub(body.target.y, anchor.y);
    let ay = graph.multiply(stiffness, dy);
    let step_y = graph.multiply(ay, body.dt);
    let vy = graph.add(body.object.vy, step_y);

    Behavior {
        x: graph.set(body.object.vx, vx),
        y: graph.set(body.object.vy, vy),
    }
}

/// Exponential velocity decay.
///
/// `damping` is the factor retained per 1/60 s, so `v *= damping^(60 * dt)`.
/// Two frames of `dt / 2` decay exactly as much as one frame of `dt`.
pub fn friction(graph: &mut AnimationGraph, body: &Body, damping: impl IntoNode) -> Behavior {
    let damping = damping.into_node(graph);
    let exponent = graph.multiply(FRICTION_REFERENCE_FPS, body.dt);
    let factor = graph.pow(damping, exponent);

    let vx = graph.multiply(body.object.vx, factor);
    let vy = graph.multiply(body.object.vy, factor);
    Behavior {
        x: graph.set(body.object.vx, vx),
        y: graph.set(body.object.vy, vy),
    }
}

/// Kinematic follow: sets the velocity that lands on `anchor` this frame.
///
/// Only meaningful under a `dt != 0` guard; with `dt == 0` the division
/// yields 0.
pub fn anchor_follow(graph: &mut AnimationGraph, body: &Body, anchor: &Anchor) -> Behavior {
    let dx = graph.sub(anchor.x, body.target.x);
    let vx = graph.divide(dx, body.dt);
    let dy = graph.sub(anchor.y, body.target.y);
    let vy = graph.divide(dy, body.dt);
    Behavior {
        x: graph.set(body.object.vx, vx),
        y: graph.set(body.object.vy, vy),
    }
}

/// Gaussian gravity well around `anchor`.
///
/// Attraction peaks at one `falloff` from the anchor and fades with
/// `exp(-dr² / (2 falloff²))`. The update is skipped while the target sits
/// exactly on the anchor (`dr == 0`).
pub fn gravity(
    graph: &mut AnimationGraph,
    body: &Body,
    anchor: &Anchor,
    strength: impl IntoNode,
    falloff: impl IntoNode,
) -> Behavior {
    let strength = strength.into_node(graph);
    let falloff = falloff.into_node(graph);

    let dx = graph.sub(body.target.x, anchor.x);
    let dy = graph.sub(body.target.y, anchor.y);
    let dx2 = graph.square(dx);
    let dy2 = graph.square(dy);
    let drsq = graph.add(dx2, dy2);
    let dr = graph.sqrt(drsq);

    let spread = graph.square(falloff);
    let scaled = graph.multiply(-0.5, drsq);
    let exponent = graph.divide(scaled, spread);
    let envelope = graph.exp(exponent);
    let pull = graph.multiply(strength, dr);
    let pull = graph.multiply(pull, envelope);
    let accel = graph.divide(pull, -body.object.mass);
    let per_unit = graph.divide(accel, dr);

    let mut axis = |delta: NodeId, velocity: CellId| {
        let step = graph.multiply(body.dt, delta);
        let step = graph.multiply(step, per_unit);
        let v = graph.add(velocity, step);
        let update = graph.set(velocity, v);
        graph.cond(dr, update)
    };
    let x = axis(dx, body.object.vx);
    let y = axis(dy, body.object.vy);
    Behavior { x, y }
}

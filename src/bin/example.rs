//! Frame Solver Example - Course Project Truss
//!
//! Run with `RUST_LOG=debug` to see the solver pipeline.

use anyhow::Result;
use frame_solver::prelude::*;

/// 2000 lbf applied load
const LOAD: f64 = 8896.4432305;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Frame Solver Example: Course Project Truss ===\n");

    let mut model = FrameSystem::new();

    // Materials and 1/2" / 0.4" round bar sections
    let steel = model.add_material(MaterialProfile::steel());
    let aluminum = model.add_material(MaterialProfile::aluminum());
    let steel_rod = model.add_section(SectionProfile::circular("1/2in rod", 0.0127));
    let alu_rod = model.add_section(SectionProfile::circular("0.4in rod", 0.01016));

    //            N3 ------- N4 (fixed wall)
    //          / |
    //        /   N1
    //      /   / |
    //    N2 ---- N0  <- load
    //   slider
    let n0 = model.add_node(Node::new(0.3048, 0.0));
    let n1 = model.add_node(Node::new(0.3048, 0.1524));
    let n2 = model.add_node(Node::new(0.0, 0.0).with_constraint(Constraint::slider(90.0)));
    let n3 = model.add_node(Node::new(0.0, 0.254));
    let n4 = model.add_node(Node::new(-0.254, 0.254).with_constraint(Constraint::Fixed));

    model.add_beam(BeamElement::truss(n0, n1, steel, steel_rod))?;
    model.add_beam(BeamElement::truss(n0, n2, aluminum, alu_rod))?;
    model.add_beam(BeamElement::truss(n1, n2, steel, steel_rod))?;
    model.add_beam(BeamElement::truss(n1, n3, aluminum, alu_rod))?;
    model.add_beam(BeamElement::truss(n2, n3, steel, steel_rod))?;
    model.add_beam(BeamElement::new(n3, n4, aluminum, alu_rod))?;

    // Load pulls down and to the left at 60°
    model.set_load(n0, NodeLoad::polar(LOAD, 240.0))?;

    println!("Running linear analysis...\n");
    let report = model.solve()?;

    println!("Node Displacements:");
    for (index, node) in model.nodes.iter().enumerate() {
        let disp = model.node_displacement(index)?;
        println!(
            "  N{} ({:>8}): DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
            index,
            node.constraint.label(),
            disp.dx * 1000.0,
            disp.dy * 1000.0,
            disp.rz
        );
    }

    println!("\nSupport Reactions:");
    for (index, node) in model.nodes.iter().enumerate() {
        if !node.constraint.is_supported() {
            continue;
        }
        let rxn = model.node_reaction(index)?;
        println!(
            "  N{}: FX={:.2}N, FY={:.2}N, MZ={:.2}N·m",
            index, rxn.fx, rxn.fy, rxn.mz
        );
    }

    println!("\nMember Forces:");
    for (index, beam) in model.beams.iter().enumerate() {
        println!(
            "  B{} (N{}-N{}, {}): P={:.2}N, Mmax={:.2}N·m, σ={:.2}MPa",
            index,
            beam.nodes[0],
            beam.nodes[1],
            if beam.truss { "truss" } else { "beam" },
            beam.axial_force(),
            beam.max_moment(),
            beam.stress() / 1e6
        );
    }

    for (index, multiplier) in model.multipliers()?.iter().enumerate() {
        println!("\nSlider multiplier {}: {:.2}N", index, multiplier);
    }
    if let Some(drift) = model.slider_drift(n2)? {
        println!(
            "Slider N{} drift: along={:.4}mm, off-track={:.3e}m",
            n2,
            drift.along * 1000.0,
            drift.perpendicular
        );
    }

    let summary = model.summary()?;
    let [fx, fy, mz] = report.equilibrium.imbalance();
    println!("\nSummary:");
    println!(
        "  Max displacement: {:.4}mm at N{}",
        summary.max_displacement * 1000.0,
        summary.max_disp_node
    );
    println!(
        "  Max reaction: {:.2}N at N{}",
        summary.max_reaction, summary.max_reaction_node
    );
    println!(
        "  Max axial: {:.2}N in B{}",
        summary.max_axial, summary.max_axial_beam
    );
    println!(
        "  Stress range: {:.2}MPa to {:.2}MPa",
        report.min_stress / 1e6,
        report.max_stress / 1e6
    );
    println!(
        "  DOFs: {} total, {} free, {} slider constraint(s)",
        report.total_dofs, report.free_dofs, report.constraints
    );
    if let Some(cond) = report.condition_number {
        println!("  Condition number: {:.3e}", cond);
    }
    println!(
        "  Equilibrium residual: FX={:.3e}, FY={:.3e}, MZ={:.3e}",
        fx, fy, mz
    );

    println!("\n=== Analysis Complete ===");
    Ok(())
}

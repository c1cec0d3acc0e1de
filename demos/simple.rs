use trussdsm::{displacement, force, point, Truss};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Two bars meeting at an apex, both feet pinned
    let mut truss = Truss::new();
    let left = truss.add_joint(point(0.0, 0.0));
    let right = truss.add_joint(point(4_000.0, 0.0));
    let apex = truss.add_joint(point(2_000.0, 1_500.0));

    // Supports, with the right foot settling 2 mm
    truss.set_support(left, [true, true])?;
    truss.set_support(right, [true, true])?;
    truss.set_settlement(right, displacement(0.0, -2.0))?;
    truss.set_load(apex, force(0.0, -50_000.0))?;

    // Steel bars
    let left_bar = truss.add_bar(left, apex)?;
    let right_bar = truss.add_bar(right, apex)?;
    for bar in [left_bar, right_bar] {
        truss.set_bar_properties(bar, 1_500.0, 200.0e3)?;
        truss.set_bar_yield_strength(bar, 250.0)?;
    }

    truss.evaluate()?;

    if let Some(apex_displacement) = truss.joint_displacement(apex) {
        println!(
            "apex: ux = {:+.4} mm, uy = {:+.4} mm",
            apex_displacement.x, apex_displacement.y
        );
    }
    for (name, bar) in [("left", left_bar), ("right", right_bar)] {
        if let (Some(axial), Some(fos)) = (
            truss.bar_axial_force(bar),
            truss.bar_factor_of_safety(bar),
        ) {
            println!("{name} bar: N = {axial:+.1} N, factor of safety = {fos:.2}");
        }
    }

    Ok(())
}

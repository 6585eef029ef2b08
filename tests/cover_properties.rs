//! Property sweeps over image sizes, container sizes and safe areas.
//!
//! Each sweep collects every violation and reports them together, so one run
//! shows the full extent of a regression instead of the first case only.

use safecover::*;

const IMAGES: &[(u32, u32)] = &[
    (1000, 500),
    (500, 1000),
    (1920, 1080),
    (640, 480),
    (333, 777),
    (1, 1),
    (4000, 10),
    (10, 4000),
];

const CONTAINERS: &[(f64, f64)] = &[
    (400.0, 400.0),
    (375.0, 812.0),
    (1440.0, 900.0),
    (100.0, 1000.0),
    (1200.0, 300.0),
    (1.0, 1.0),
    (333.0, 333.0),
    (400.6, 200.0),
    (300.0, 250.5),
    (333.4, 812.25),
];

const SAFE_AREAS: &[&str] = &[
    "0%,0%,100%,100%",
    "25%,0%,75%,100%",
    "60%,10%,90%,90%",
    "0%,20%,100%,50%",
    "40%,40%,60%,60%",
    "0%,0%,10%,10%",
    "90%,90%,100%,100%",
    "0,0,1,1",
    "10,10,50,50",
];

/// Rendered pixels of slack for rounding of size and offset.
const TOLERANCE: f64 = 1.0;

/// Coverage slack: none for whole-pixel containers, rounding error otherwise.
fn coverage_slack(c: ContainerSize) -> f64 {
    if c.width.fract() == 0.0 && c.height.fract() == 0.0 {
        0.0
    } else {
        TOLERANCE
    }
}

struct Case {
    image: ImageSize,
    spec: SafeAreaSpec,
    container: ContainerSize,
}

impl Case {
    fn name(&self) -> String {
        format!(
            "{}x{} safe={} in {}x{}",
            self.image.width(),
            self.image.height(),
            self.spec,
            self.container.width,
            self.container.height
        )
    }
}

/// Every combination whose safe area lies within the image.
fn cases() -> Vec<Case> {
    let mut out = Vec::new();
    for &(iw, ih) in IMAGES {
        let image = ImageSize::new(iw, ih).unwrap();
        for spec in SAFE_AREAS {
            let spec = SafeAreaSpec::parse(spec).unwrap();
            let rect = spec.resolve(image);
            if !ImageRect::full(image).contains(&rect, 0.0) {
                continue;
            }
            for &(cw, ch) in CONTAINERS {
                out.push(Case {
                    image,
                    spec,
                    container: ContainerSize::new(cw, ch),
                });
            }
        }
    }
    out
}

/// Safe area edges in container coordinates: (left, top, right, bottom).
fn safe_in_container(layout: &CoverLayout, image: ImageSize, safe: &ImageRect) -> (f64, f64, f64, f64) {
    let scale = layout.scale(image);
    (
        safe.x1 * scale + layout.offset_x,
        safe.y1 * scale + layout.offset_y,
        safe.x2 * scale + layout.offset_x,
        safe.y2 * scale + layout.offset_y,
    )
}

fn report(failures: &[String], what: &str) {
    assert!(
        failures.is_empty(),
        "{what}: {} failures:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn aspect_ratio_preserved() {
    let mut failures = vec![];
    for case in cases() {
        for fit in [FitPolicy::Cover, FitPolicy::ContainSafeArea] {
            let engine = CoverLayoutEngine::new(case.image, case.spec).fit_policy(fit);
            let layout = engine.layout(case.container);
            let aspect = case.image.aspect();
            // Whichever side was derived is off by at most half a pixel.
            let ok = (layout.width - layout.height * aspect).abs() <= aspect.max(1.0)
                || (layout.height - layout.width / aspect).abs() <= (1.0 / aspect).max(1.0);
            if !ok {
                failures.push(format!("{} {fit:?}: {}x{}", case.name(), layout.width, layout.height));
            }
        }
    }
    report(&failures, "aspect");
}

#[test]
fn cover_fills_container() {
    let mut failures = vec![];
    for case in cases() {
        for clamp in [ClampPolicy::Centered, ClampPolicy::Legacy] {
            let engine = CoverLayoutEngine::new(case.image, case.spec).clamp_policy(clamp);
            let l = engine.layout(case.container);
            let c = case.container;
            let slack = coverage_slack(c);
            if l.width + slack < c.width
                || l.height + slack < c.height
                || l.offset_x > 0.0
                || l.offset_y > 0.0
                || l.offset_x + l.width + slack < c.width
                || l.offset_y + l.height + slack < c.height
            {
                failures.push(format!("{} {clamp:?}: {l:?}", case.name()));
            }
        }
    }
    report(&failures, "coverage");
}

#[test]
fn safe_area_kept_in_view_when_it_fits() {
    let mut failures = vec![];
    let mut checked = 0;
    for case in cases() {
        for fit in [FitPolicy::Cover, FitPolicy::ContainSafeArea] {
            for clamp in [ClampPolicy::Centered, ClampPolicy::Legacy] {
                let engine = CoverLayoutEngine::new(case.image, case.spec)
                    .fit_policy(fit)
                    .clamp_policy(clamp);
                let safe = *engine.safe_area();
                let l = engine.layout(case.container);
                let scale = l.scale(case.image);
                let c = case.container;
                if safe.width() * scale > c.width - TOLERANCE
                    || safe.height() * scale > c.height - TOLERANCE
                {
                    continue;
                }
                checked += 1;
                if !l.safe_area_visible {
                    failures.push(format!("{} {fit:?} {clamp:?}: flagged not visible", case.name()));
                }
                let (left, top, right, bottom) = safe_in_container(&l, case.image, &safe);
                if left < -TOLERANCE
                    || top < -TOLERANCE
                    || right > c.width + TOLERANCE
                    || bottom > c.height + TOLERANCE
                {
                    failures.push(format!(
                        "{} {fit:?} {clamp:?}: safe at ({left:.1},{top:.1})-({right:.1},{bottom:.1})",
                        case.name()
                    ));
                }
            }
        }
    }
    assert!(checked > 0);
    report(&failures, "containment");
}

#[test]
fn oversized_safe_area_is_centered() {
    let mut failures = vec![];
    for case in cases() {
        let engine = CoverLayoutEngine::new(case.image, case.spec);
        let safe = *engine.safe_area();
        let l = engine.layout(case.container);
        let (left, top, right, bottom) = safe_in_container(&l, case.image, &safe);
        let c = case.container;
        if right - left > c.width + TOLERANCE && ((left + right) / 2.0 - c.width / 2.0).abs() > TOLERANCE {
            failures.push(format!("{}: x span {left:.1}..{right:.1}", case.name()));
        }
        if bottom - top > c.height + TOLERANCE && ((top + bottom) / 2.0 - c.height / 2.0).abs() > TOLERANCE {
            failures.push(format!("{}: y span {top:.1}..{bottom:.1}", case.name()));
        }
    }
    report(&failures, "centering");
}

#[test]
fn layout_is_idempotent() {
    let mut failures = vec![];
    for case in cases() {
        let engine = CoverLayoutEngine::new(case.image, case.spec);
        let a = engine.layout(case.container);
        let b = engine.layout(case.container);
        if a.to_placement() != b.to_placement() || a.safe_area_visible != b.safe_area_visible {
            failures.push(format!("{}: {a:?} vs {b:?}", case.name()));
        }
    }
    report(&failures, "idempotence");
}

#[test]
fn layouts_are_integral() {
    let mut failures = vec![];
    for case in cases() {
        let l = CoverLayoutEngine::new(case.image, case.spec).layout(case.container);
        let integral = [l.width, l.height, l.offset_x, l.offset_y]
            .iter()
            .all(|v| v.fract() == 0.0);
        let truncated = l.to_placement().is_some_and(|p| {
            p.width as f64 != l.width
                || p.height as f64 != l.height
                || p.x as f64 != l.offset_x
                || p.y as f64 != l.offset_y
        });
        if !integral || truncated || l.to_placement().is_none() {
            failures.push(format!("{}: {l:?}", case.name()));
        }
    }
    report(&failures, "integral");
}

#[test]
fn degenerate_containers_never_render() {
    let image = ImageSize::new(1000, 500).unwrap();
    let engine = CoverLayoutEngine::new(image, SafeAreaSpec::default());
    for (w, h) in [(0.0, 400.0), (400.0, 0.0), (-1.0, 10.0), (f64::NAN, 10.0), (f64::INFINITY, 10.0)] {
        let l = engine.layout(ContainerSize::new(w, h));
        assert!(!l.is_finite(), "{w}x{h}: {l:?}");
        assert_eq!(l.to_placement(), None);
    }
}

#[test]
fn documented_scenarios() {
    let image = ImageSize::new(1000, 500).unwrap();
    let square = ContainerSize::new(400.0, 400.0);

    let l = CoverLayoutEngine::new(image, SafeAreaSpec::default()).layout(square);
    assert_eq!(l.to_placement(), Some(Placement { width: 800, height: 400, x: -200, y: 0 }));
    assert!(!l.safe_area_visible);

    let spec = SafeAreaSpec::parse("25%,0%,75%,100%").unwrap();
    let l = CoverLayoutEngine::new(image, spec).layout(square);
    assert_eq!(l.to_placement(), Some(Placement { width: 800, height: 400, x: -200, y: 0 }));
    assert!(l.safe_area_visible);

    let spec = SafeAreaSpec::parse("0%,0%,25%,100%").unwrap();
    let l = CoverLayoutEngine::new(image, spec).layout(square);
    assert_eq!(l.to_placement(), Some(Placement { width: 800, height: 400, x: 0, y: 0 }));

    let spec = SafeAreaSpec::parse("75%,0%,100%,100%").unwrap();
    let l = CoverLayoutEngine::new(image, spec).layout(square);
    assert_eq!(l.to_placement(), Some(Placement { width: 800, height: 400, x: -400, y: 0 }));
}

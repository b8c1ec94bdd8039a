//! # Paint 模块
//!
//! 绘制区域（paint volume）计算辅助。
//!
//! 变换或形变后的窗口可能超出原始包围盒，宿主需要据此扩大重绘区域。

use crate::geometry::{AnimBox, Vector, Vector4};

/// 将矩形量化为稳定的像素尺寸
///
/// 宽高四舍五入为整数像素，右下角外扩 0.75 像素后向上取整，
/// 再由取整后的尺寸加 3 像素反推左上角。这样同一尺寸的窗口在任意
/// 亚像素位置得到的包围盒尺寸相同。
pub fn enlarge_for_effects(area: AnimBox) -> AnimBox {
    let width = area.width().round();
    let height = area.height().round();

    let x2 = (area.bottom_right.x + 0.75).ceil();
    let y2 = (area.bottom_right.y + 0.75).ceil();

    AnimBox::from_coords(x2 - width - 3.0, y2 - height - 3.0, x2, y2)
}

/// 两个矩形的并集
pub fn union(a: AnimBox, b: AnimBox) -> AnimBox {
    AnimBox::new(
        a.top_left.min(b.top_left),
        a.bottom_right.max(b.bottom_right),
    )
}

/// 用四个变换后角点扩展绘制区域
///
/// `extremes` 顺序：左上、右上、左下、右下。`offset` 为额外外扩量。
pub fn expand_with_extremes(area: AnimBox, extremes: &[Vector4; 4], offset: Vector) -> AnimBox {
    let [tl, tr, bl, br] = extremes;

    let x1 = tl.x.min(bl.x) - offset.x;
    let y1 = tl.y.min(tr.y) - offset.y;
    let x2 = tr.x.max(br.x) + offset.x;
    let y2 = bl.y.max(br.y) + offset.y;

    union(area, AnimBox::from_coords(x1, y1, x2, y2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enlarge_is_position_independent() {
        let a = enlarge_for_effects(AnimBox::from_coords(0.0, 0.0, 100.0, 100.0));
        let b = enlarge_for_effects(AnimBox::from_coords(0.3, 0.6, 100.3, 100.6));

        assert_eq!(a.size(), b.size());
        assert_eq!(a.size(), Vector::new(103.0, 103.0));
    }

    #[test]
    fn test_enlarge_covers_original() {
        let original = AnimBox::from_coords(10.5, 20.25, 110.5, 70.25);
        let enlarged = enlarge_for_effects(original);

        assert!(enlarged.top_left.x < original.top_left.x);
        assert!(enlarged.top_left.y < original.top_left.y);
        assert!(enlarged.bottom_right.x > original.bottom_right.x);
        assert!(enlarged.bottom_right.y > original.bottom_right.y);
    }

    #[test]
    fn test_expand_with_extremes() {
        let area = AnimBox::from_coords(0.0, 0.0, 100.0, 100.0);
        let extremes = [
            Vector4::new(-10.0, -5.0, 0.0, 1.0),
            Vector4::new(120.0, 0.0, 0.0, 1.0),
            Vector4::new(0.0, 100.0, 0.0, 1.0),
            Vector4::new(100.0, 130.0, 0.0, 1.0),
        ];

        let expanded = expand_with_extremes(area, &extremes, Vector::ZERO);
        assert_eq!(expanded, AnimBox::from_coords(-10.0, -5.0, 120.0, 130.0));
    }

    #[test]
    fn test_expand_never_shrinks() {
        let area = AnimBox::from_coords(0.0, 0.0, 100.0, 100.0);
        let inner = [
            Vector4::new(40.0, 40.0, 0.0, 1.0),
            Vector4::new(60.0, 40.0, 0.0, 1.0),
            Vector4::new(40.0, 60.0, 0.0, 1.0),
            Vector4::new(60.0, 60.0, 0.0, 1.0),
        ];

        assert_eq!(expand_with_extremes(area, &inner, Vector::ZERO), area);
    }
}

//! Turns a runtime shift amount into the compile-time immediate the shift
//! intrinsics require (§9: "shift immediates must be compile-time, never a
//! runtime-indexed shift"). `shift_dispatch!` is the one place that owns the
//! 0..64 match; every call site just names the const-generic shift fn.

macro_rules! shift_dispatch {
    ($func:path, $a:expr, $imm:expr) => {
        match $imm {
            0 => $func::<0>($a),
            1 => $func::<1>($a),
            2 => $func::<2>($a),
            3 => $func::<3>($a),
            4 => $func::<4>($a),
            5 => $func::<5>($a),
            6 => $func::<6>($a),
            7 => $func::<7>($a),
            8 => $func::<8>($a),
            9 => $func::<9>($a),
            10 => $func::<10>($a),
            11 => $func::<11>($a),
            12 => $func::<12>($a),
            13 => $func::<13>($a),
            14 => $func::<14>($a),
            15 => $func::<15>($a),
            16 => $func::<16>($a),
            17 => $func::<17>($a),
            18 => $func::<18>($a),
            19 => $func::<19>($a),
            20 => $func::<20>($a),
            21 => $func::<21>($a),
            22 => $func::<22>($a),
            23 => $func::<23>($a),
            24 => $func::<24>($a),
            25 => $func::<25>($a),
            26 => $func::<26>($a),
            27 => $func::<27>($a),
            28 => $func::<28>($a),
            29 => $func::<29>($a),
            30 => $func::<30>($a),
            31 => $func::<31>($a),
            32 => $func::<32>($a),
            33 => $func::<33>($a),
            34 => $func::<34>($a),
            35 => $func::<35>($a),
            36 => $func::<36>($a),
            37 => $func::<37>($a),
            38 => $func::<38>($a),
            39 => $func::<39>($a),
            40 => $func::<40>($a),
            41 => $func::<41>($a),
            42 => $func::<42>($a),
            43 => $func::<43>($a),
            44 => $func::<44>($a),
            45 => $func::<45>($a),
            46 => $func::<46>($a),
            47 => $func::<47>($a),
            48 => $func::<48>($a),
            49 => $func::<49>($a),
            50 => $func::<50>($a),
            51 => $func::<51>($a),
            52 => $func::<52>($a),
            53 => $func::<53>($a),
            54 => $func::<54>($a),
            55 => $func::<55>($a),
            56 => $func::<56>($a),
            57 => $func::<57>($a),
            58 => $func::<58>($a),
            59 => $func::<59>($a),
            60 => $func::<60>($a),
            61 => $func::<61>($a),
            62 => $func::<62>($a),
            // Lane widths narrower than 64 bits never ask past their own
            // width; x86 shift-by->=width intrinsics zero the lane, which
            // is the correct behavior for callers that do overshoot.
            _ => $func::<63>($a),
        }
    };
}

pub(crate) use shift_dispatch;
